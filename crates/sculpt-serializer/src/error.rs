//! Error types for serialization

use sculpt_rules::RuleError;
use thiserror::Error;

/// Boxed error reported by an entity or a caller-supplied converter
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while serializing an entity graph
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SerializeError {
	/// A rule source could not be parsed
	#[error(transparent)]
	Rule(#[from] RuleError),

	/// No converter accepts the value
	#[error("Value of type '{type_name}' is not serializable")]
	UnserializableType { type_name: String },

	/// A format string could not be applied to a value
	#[error("Invalid {kind} format '{format}'")]
	InvalidFormat { kind: &'static str, format: String },

	/// The entity failed to produce an attribute value
	#[error("Failed to read attribute '{attribute}': {source}")]
	Attribute {
		attribute: String,
		#[source]
		source: BoxError,
	},

	/// A caller-supplied converter failed
	#[error("Converter failed{}: {source}", for_attribute(.attribute))]
	Converter {
		attribute: Option<String>,
		#[source]
		source: BoxError,
	},
}

fn for_attribute(attribute: &Option<String>) -> String {
	match attribute {
		Some(name) => format!(" for attribute '{name}'"),
		None => String::new(),
	}
}

impl SerializeError {
	pub(crate) fn unserializable(type_name: impl Into<String>) -> Self {
		SerializeError::UnserializableType {
			type_name: type_name.into(),
		}
	}

	pub(crate) fn invalid_format(kind: &'static str, format: &str) -> Self {
		SerializeError::InvalidFormat {
			kind,
			format: format.to_string(),
		}
	}

	pub(crate) fn attribute(attribute: &str, source: BoxError) -> Self {
		SerializeError::Attribute {
			attribute: attribute.to_string(),
			source,
		}
	}

	pub(crate) fn converter(attribute: Option<&str>, source: BoxError) -> Self {
		SerializeError::Converter {
			attribute: attribute.map(str::to_string),
			source,
		}
	}

	/// Whether no converter matched the value
	///
	/// Sequence recursion swallows exactly these failures unless strict collection
	/// handling is enabled.
	pub fn is_unserializable(&self) -> bool {
		matches!(self, SerializeError::UnserializableType { .. })
	}
}

/// Result type for serialization operations
pub type Result<T> = std::result::Result<T, SerializeError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_messages() {
		let err = SerializeError::unserializable("my_crate::Socket");
		assert_eq!(
			err.to_string(),
			"Value of type 'my_crate::Socket' is not serializable"
		);
		assert!(err.is_unserializable());

		let err = SerializeError::converter(Some("price"), "negative amount".into());
		assert_eq!(
			err.to_string(),
			"Converter failed for attribute 'price': negative amount"
		);
		assert!(!err.is_unserializable());

		let err = SerializeError::converter(None, "boom".into());
		assert_eq!(err.to_string(), "Converter failed: boom");
	}

	#[test]
	fn test_rule_error_is_wrapped() {
		let rule_err = sculpt_rules::Rule::parse("a..b").unwrap_err();
		let err: SerializeError = rule_err.into();
		assert!(err.to_string().starts_with("Malformed rule 'a..b'"));
	}
}
