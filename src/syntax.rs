//! Syntax adapters for Terraform configuration.
//!
//! Both the native HCL syntax and its JSON encoding produce the same
//! [`Document`] type, so downstream consumers never care which one a file used.

use std::fmt;

/// Which encoding a document was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
	Hcl,
	Json,
}

impl Syntax {
	pub fn as_str(&self) -> &'static str {
		match self {
			Syntax::Hcl => "HCL",
			Syntax::Json => "JSON",
		}
	}
}

impl fmt::Display for Syntax {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A parsed configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
	body: hcl::Body,
	syntax: Syntax,
}

impl Document {
	/// The parsed body.
	pub fn body(&self) -> &hcl::Body {
		&self.body
	}

	/// The encoding this document was read from.
	pub fn syntax(&self) -> Syntax {
		self.syntax
	}
}

/// Failure to parse bytes in a given syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{syntax} syntax: {message}")]
pub struct ParseFailure {
	pub syntax: Syntax,
	pub message: String,
}

impl ParseFailure {
	fn new(syntax: Syntax, message: impl fmt::Display) -> Self {
		ParseFailure {
			syntax,
			message: message.to_string(),
		}
	}
}

/// A strategy for turning raw bytes into a [`Document`].
pub trait SyntaxParser {
	fn syntax(&self) -> Syntax;

	fn parse(&self, bytes: &[u8]) -> Result<Document, ParseFailure>;
}

/// Native HCL syntax (`*.tf`, `*.tfvars`).
#[derive(Debug, Clone, Copy, Default)]
pub struct HclSyntax;

impl SyntaxParser for HclSyntax {
	fn syntax(&self) -> Syntax {
		Syntax::Hcl
	}

	fn parse(&self, bytes: &[u8]) -> Result<Document, ParseFailure> {
		let text = std::str::from_utf8(bytes).map_err(|e| ParseFailure::new(Syntax::Hcl, e))?;
		let body = hcl::parse(text).map_err(|e| ParseFailure::new(Syntax::Hcl, e))?;
		Ok(Document {
			body,
			syntax: Syntax::Hcl,
		})
	}
}

/// JSON encoding of the same schema (`*.tf.json`, `*.tfvars.json`).
///
/// Only a top-level JSON object is accepted. Each member becomes a top-level
/// attribute; nested objects stay object expressions rather than blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSyntax;

impl SyntaxParser for JsonSyntax {
	fn syntax(&self) -> Syntax {
		Syntax::Json
	}

	fn parse(&self, bytes: &[u8]) -> Result<Document, ParseFailure> {
		let value: serde_json::Value =
			serde_json::from_slice(bytes).map_err(|e| ParseFailure::new(Syntax::Json, e))?;
		if !value.is_object() {
			return Err(ParseFailure::new(
				Syntax::Json,
				"top-level value must be an object",
			));
		}
		let text = hcl::to_string(&value).map_err(|e| ParseFailure::new(Syntax::Json, e))?;
		let body = hcl::parse(&text).map_err(|e| ParseFailure::new(Syntax::Json, e))?;
		Ok(Document {
			body,
			syntax: Syntax::Json,
		})
	}
}

/// Try each parser in order and return the first document produced.
///
/// On total failure every parser's error is returned, in the order tried.
pub fn parse_with_fallback(
	parsers: &[&dyn SyntaxParser],
	bytes: &[u8],
) -> Result<Document, Vec<ParseFailure>> {
	let mut failures = Vec::with_capacity(parsers.len());
	for parser in parsers {
		match parser.parse(bytes) {
			Ok(document) => return Ok(document),
			Err(failure) => failures.push(failure),
		}
	}
	Err(failures)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hcl_parses_resource_block() {
		let src = br#"
resource "aws_instance" "web" {
  instance_type = "t2.micro"
}
"#;
		let doc = HclSyntax.parse(src).unwrap();
		assert_eq!(doc.syntax(), Syntax::Hcl);
		assert_eq!(doc.body().blocks().count(), 1);
	}

	#[test]
	fn test_hcl_rejects_unclosed_block() {
		let err = HclSyntax.parse(b"resource \"a\" \"b\" {").unwrap_err();
		assert_eq!(err.syntax, Syntax::Hcl);
	}

	#[test]
	fn test_hcl_rejects_invalid_utf8() {
		assert!(HclSyntax.parse(&[0xff, 0xfe, 0x00]).is_err());
	}

	#[test]
	fn test_json_parses_object() {
		let doc = JsonSyntax
			.parse(br#"{"region": "us-east-1", "count": 3}"#)
			.unwrap();
		assert_eq!(doc.syntax(), Syntax::Json);
		assert_eq!(doc.body().attributes().count(), 2);
	}

	#[test]
	fn test_json_nested_objects_are_attributes() {
		let doc = JsonSyntax
			.parse(br#"{"variable": {"region": {"default": "us-east-1"}}}"#)
			.unwrap();
		assert_eq!(doc.body().blocks().count(), 0);
		assert_eq!(doc.body().attributes().count(), 1);
	}

	#[test]
	fn test_json_rejects_non_object() {
		let err = JsonSyntax.parse(b"[1, 2, 3]").unwrap_err();
		assert_eq!(err.syntax, Syntax::Json);
	}

	#[test]
	fn test_fallback_uses_second_parser() {
		let parsers: [&dyn SyntaxParser; 2] = [&HclSyntax, &JsonSyntax];
		let doc = parse_with_fallback(&parsers, br#"{"region": "eu-west-1"}"#).unwrap();
		assert_eq!(doc.syntax(), Syntax::Json);
	}

	#[test]
	fn test_fallback_prefers_first_parser() {
		let parsers: [&dyn SyntaxParser; 2] = [&HclSyntax, &JsonSyntax];
		let doc = parse_with_fallback(&parsers, b"region = \"eu-west-1\"\n").unwrap();
		assert_eq!(doc.syntax(), Syntax::Hcl);
	}

	#[test]
	fn test_fallback_collects_all_failures() {
		let parsers: [&dyn SyntaxParser; 2] = [&HclSyntax, &JsonSyntax];
		let failures = parse_with_fallback(&parsers, b"region = = {").unwrap_err();
		assert_eq!(failures.len(), 2);
		assert_eq!(failures[0].syntax, Syntax::Hcl);
		assert_eq!(failures[1].syntax, Syntax::Json);
	}
}
