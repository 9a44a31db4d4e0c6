use thiserror::Error;

/// Errors that can occur while parsing serialization rules
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
	/// Rule text could not be turned into a path
	#[error("Malformed rule '{rule}': {reason}")]
	Malformed { rule: String, reason: &'static str },
}

impl RuleError {
	pub(crate) fn malformed(rule: &str, reason: &'static str) -> Self {
		RuleError::Malformed {
			rule: rule.to_string(),
			reason,
		}
	}

	/// Returns the offending rule text
	pub fn rule(&self) -> &str {
		match self {
			RuleError::Malformed { rule, .. } => rule,
		}
	}
}

/// Result type for rule operations
pub type Result<T> = std::result::Result<T, RuleError>;
