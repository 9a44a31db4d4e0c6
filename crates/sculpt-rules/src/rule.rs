//! Textual serialization rules
//!
//! A rule is a dotted attribute path with an optional leading negation marker:
//! `author.name` keeps `name` of the nested `author`, `-author.email` drops it.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RuleError};

/// Separates nested segments of a rule path
pub const DELIMITER: char = '.';

/// Marks a rule as an exclusion when it prefixes the path
pub const NEGATION: char = '-';

/// Whether a rule keeps or drops the attribute it names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
	Include,
	Exclude,
}

/// One parsed include/exclude instruction bound to an attribute path
///
/// # Examples
///
/// ```
/// use sculpt_rules::{Polarity, Rule};
///
/// let rule = Rule::parse("-author.email").unwrap();
/// assert_eq!(rule.polarity(), Polarity::Exclude);
/// assert_eq!(rule.segments(), ["author", "email"]);
/// assert_eq!(rule.to_string(), "-author.email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
	segments: Vec<String>,
	polarity: Polarity,
}

impl Rule {
	/// Parse a rule from its textual form
	///
	/// Fails when the text is empty, holds only the negation marker, or contains an
	/// empty segment (`a..b`, `.a`, `a.`).
	pub fn parse(text: &str) -> Result<Self> {
		if text.is_empty() {
			return Err(RuleError::malformed(text, "rule is empty"));
		}

		let (polarity, path) = match text.strip_prefix(NEGATION) {
			Some(rest) => (Polarity::Exclude, rest),
			None => (Polarity::Include, text),
		};

		if path.is_empty() {
			return Err(RuleError::malformed(text, "rule has no path after the negation marker"));
		}

		let mut segments = Vec::new();
		for segment in path.split(DELIMITER) {
			if segment.is_empty() {
				return Err(RuleError::malformed(text, "rule contains an empty segment"));
			}
			if segment.starts_with(NEGATION) {
				return Err(RuleError::malformed(
					text,
					"negation marker is only allowed at the start of a rule",
				));
			}
			segments.push(segment.to_string());
		}

		Ok(Self { segments, polarity })
	}

	/// Parse every rule of a rule source, stopping at the first malformed one
	pub fn parse_all<I, S>(rules: I) -> Result<Vec<Rule>>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		rules.into_iter().map(|r| Rule::parse(r.as_ref())).collect()
	}

	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	pub fn polarity(&self) -> Polarity {
		self.polarity
	}

	pub fn is_negative(&self) -> bool {
		self.polarity == Polarity::Exclude
	}

	/// Top-level attribute the rule starts from
	pub fn head(&self) -> &str {
		// Parsing guarantees at least one segment
		&self.segments[0]
	}
}

impl FromStr for Rule {
	type Err = RuleError;

	fn from_str(s: &str) -> Result<Self> {
		Rule::parse(s)
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_negative() {
			write!(f, "{}", NEGATION)?;
		}
		for (i, segment) in self.segments.iter().enumerate() {
			if i > 0 {
				write!(f, "{}", DELIMITER)?;
			}
			f.write_str(segment)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("simple", &["simple"], false)]
	#[case("double.rule", &["double", "rule"], false)]
	#[case("-negative", &["negative"], true)]
	#[case("-negative.rule", &["negative", "rule"], true)]
	fn test_parse_rule(#[case] text: &str, #[case] segments: &[&str], #[case] negative: bool) {
		let rule = Rule::parse(text).unwrap();

		assert_eq!(rule.segments(), segments);
		assert_eq!(rule.is_negative(), negative);
		assert_eq!(rule.to_string(), text);
	}

	#[rstest]
	#[case("")]
	#[case("-")]
	#[case("a..b")]
	#[case(".a")]
	#[case("a.")]
	#[case("--a")]
	#[case("a.-b")]
	fn test_parse_malformed_rule(#[case] text: &str) {
		let err = Rule::parse(text).unwrap_err();
		assert_eq!(err.rule(), text);
	}

	#[test]
	fn test_parse_all_stops_at_first_error() {
		let err = Rule::parse_all(["a", "b.c", "", "d"]).unwrap_err();
		assert!(matches!(err, RuleError::Malformed { .. }));

		let rules = Rule::parse_all(["a", "-b.c"]).unwrap();
		assert_eq!(rules.len(), 2);
		assert_eq!(rules[1].head(), "b");
	}

	#[test]
	fn test_from_str() {
		let rule: Rule = "-a.b".parse().unwrap();
		assert_eq!(rule.polarity(), Polarity::Exclude);
	}
}
