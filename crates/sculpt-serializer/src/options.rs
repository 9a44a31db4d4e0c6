//! Serialization options
//!
//! [`Options`] bundles everything a caller can tune for one serialization call.
//! Every field is optional so that call-time options can be layered over the
//! defaults an entity declares: a field set by the caller wins, an unset one
//! falls back to the entity's.

use std::collections::HashMap;
use std::fmt;

use chrono_tz::Tz;
use serde_json::Value;

use crate::converters::{AttributeConverter, TypeConverter};
use crate::error::BoxError;
use crate::value::FieldValue;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_DECIMAL_FORMAT: &str = "{}";

/// Per-kind format strings
///
/// Date and time formats use `strftime` syntax; an empty one renders ISO 8601. The
/// decimal format is one numeric replacement field such as `{}`, `{:.2f}` or
/// `{:>10,.3}`, optionally surrounded by literal text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "settings", derive(serde::Deserialize))]
#[cfg_attr(feature = "settings", serde(default))]
pub struct Formats {
	pub date: Option<String>,
	pub time: Option<String>,
	pub datetime: Option<String>,
	pub decimal: Option<String>,
}

impl Formats {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn date(mut self, format: impl Into<String>) -> Self {
		self.date = Some(format.into());
		self
	}

	pub fn time(mut self, format: impl Into<String>) -> Self {
		self.time = Some(format.into());
		self
	}

	pub fn datetime(mut self, format: impl Into<String>) -> Self {
		self.datetime = Some(format.into());
		self
	}

	pub fn decimal(mut self, format: impl Into<String>) -> Self {
		self.decimal = Some(format.into());
		self
	}

	pub fn date_format(&self) -> &str {
		self.date.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
	}

	pub fn time_format(&self) -> &str {
		self.time.as_deref().unwrap_or(DEFAULT_TIME_FORMAT)
	}

	pub fn datetime_format(&self) -> &str {
		self.datetime.as_deref().unwrap_or(DEFAULT_DATETIME_FORMAT)
	}

	pub fn decimal_format(&self) -> &str {
		self.decimal.as_deref().unwrap_or(DEFAULT_DECIMAL_FORMAT)
	}

	/// Copy with every unset format replaced by its default
	pub fn resolved(&self) -> Formats {
		Formats {
			date: Some(self.date_format().to_string()),
			time: Some(self.time_format().to_string()),
			datetime: Some(self.datetime_format().to_string()),
			decimal: Some(self.decimal_format().to_string()),
		}
	}

	/// Fill the formats unset here from `fallback`
	pub fn layer(&self, fallback: &Formats) -> Formats {
		Formats {
			date: self.date.clone().or_else(|| fallback.date.clone()),
			time: self.time.clone().or_else(|| fallback.time.clone()),
			datetime: self.datetime.clone().or_else(|| fallback.datetime.clone()),
			decimal: self.decimal.clone().or_else(|| fallback.decimal.clone()),
		}
	}
}

/// Configuration of one serialization call
///
/// # Examples
///
/// ```
/// use sculpt_serializer::{Formats, Options};
///
/// let options = Options::new()
///     .only(["id", "author.name"])
///     .rules(["-author.email"])
///     .formats(Formats::new().date("%d.%m.%Y"))
///     .max_depth(2)
///     .drop_values([serde_json::Value::Null]);
///
/// assert_eq!(options.max_depth_limit(), Some(2));
/// assert_eq!(options.formats_ref().date_format(), "%d.%m.%Y");
/// ```
#[derive(Clone, Default)]
pub struct Options {
	pub(crate) only: Vec<String>,
	pub(crate) rules: Vec<String>,
	pub(crate) time_zone: Option<Tz>,
	pub(crate) formats: Formats,
	pub(crate) type_converters: Vec<TypeConverter>,
	pub(crate) attribute_converters: HashMap<String, AttributeConverter>,
	pub(crate) keys: Option<Vec<String>>,
	pub(crate) include_properties: Option<bool>,
	pub(crate) max_depth: Option<usize>,
	pub(crate) drop_values: Option<Vec<Value>>,
	pub(crate) strict_collections: Option<bool>,
}

impl Options {
	pub fn new() -> Self {
		Self::default()
	}

	/// Exact rules: only the named attributes are serialized
	pub fn only<I, S>(mut self, rules: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.only = rules.into_iter().map(Into::into).collect();
		self
	}

	/// Additive rules layered over every other rule source
	pub fn rules<I, S>(mut self, rules: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.rules = rules.into_iter().map(Into::into).collect();
		self
	}

	/// Time zone date-times are converted into before formatting
	pub fn time_zone(mut self, tz: Tz) -> Self {
		self.time_zone = Some(tz);
		self
	}

	pub fn formats(mut self, formats: Formats) -> Self {
		self.formats = formats;
		self
	}

	/// Append a custom type converter, checked before the built-in ones
	pub fn type_converter(mut self, converter: TypeConverter) -> Self {
		self.type_converters.push(converter);
		self
	}

	/// Register a converter for every attribute called `name`
	pub fn attribute_converter<F>(mut self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(&FieldValue) -> Result<Value, BoxError> + Send + Sync + 'static,
	{
		self.attribute_converters
			.insert(name.into(), AttributeConverter::new(f));
		self
	}

	/// Explicit attribute names, replacing discovery
	pub fn keys<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.keys = Some(keys.into_iter().map(Into::into).collect());
		self
	}

	/// Serialize computed properties alongside stored fields
	pub fn include_properties(mut self, include: bool) -> Self {
		self.include_properties = Some(include);
		self
	}

	pub fn max_depth(mut self, depth: usize) -> Self {
		self.max_depth = Some(depth);
		self
	}

	/// Serialized values whose entries are removed from the output
	pub fn drop_values<I: IntoIterator<Item = Value>>(mut self, values: I) -> Self {
		self.drop_values = Some(values.into_iter().collect());
		self
	}

	/// Fail on unserializable sequence elements instead of skipping them
	pub fn strict_collections(mut self, strict: bool) -> Self {
		self.strict_collections = Some(strict);
		self
	}

	pub fn only_rules(&self) -> &[String] {
		&self.only
	}

	pub fn extend_rules(&self) -> &[String] {
		&self.rules
	}

	pub fn time_zone_ref(&self) -> Option<&Tz> {
		self.time_zone.as_ref()
	}

	pub fn formats_ref(&self) -> &Formats {
		&self.formats
	}

	pub fn explicit_keys(&self) -> Option<&[String]> {
		self.keys.as_deref()
	}

	pub fn includes_properties(&self) -> bool {
		self.include_properties.unwrap_or(false)
	}

	pub fn max_depth_limit(&self) -> Option<usize> {
		self.max_depth
	}

	pub fn is_strict_collections(&self) -> bool {
		self.strict_collections.unwrap_or(false)
	}

	pub(crate) fn drops(&self, value: &Value) -> bool {
		self.drop_values
			.as_ref()
			.is_some_and(|values| values.contains(value))
	}

	/// Layer these options over the ones an entity declares
	///
	/// Scalar settings set here win. Custom type converters set here are checked
	/// before the declared ones, and per-attribute converters set here replace
	/// declared converters of the same attribute. Rule fields are taken from
	/// `self` only.
	pub fn layer(&self, declared: &Options) -> Options {
		let mut type_converters = self.type_converters.clone();
		type_converters.extend(declared.type_converters.iter().cloned());

		let mut attribute_converters = declared.attribute_converters.clone();
		attribute_converters.extend(
			self.attribute_converters
				.iter()
				.map(|(name, converter)| (name.clone(), converter.clone())),
		);

		Options {
			only: self.only.clone(),
			rules: self.rules.clone(),
			time_zone: self.time_zone.or(declared.time_zone),
			formats: self.formats.layer(&declared.formats),
			type_converters,
			attribute_converters,
			keys: self.keys.clone().or_else(|| declared.keys.clone()),
			include_properties: self.include_properties.or(declared.include_properties),
			max_depth: self.max_depth.or(declared.max_depth),
			drop_values: self
				.drop_values
				.clone()
				.or_else(|| declared.drop_values.clone()),
			strict_collections: self.strict_collections.or(declared.strict_collections),
		}
	}

	/// Copy without rules and explicit keys, as handed to nested scopes
	///
	/// Rules reach nested scopes only through the descended schema, and explicit
	/// keys name attributes of one entity type.
	pub(crate) fn for_nested(&self) -> Options {
		Options {
			only: Vec::new(),
			rules: Vec::new(),
			keys: None,
			..self.clone()
		}
	}
}

impl fmt::Debug for Options {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut attributes: Vec<&String> = self.attribute_converters.keys().collect();
		attributes.sort();
		f.debug_struct("Options")
			.field("only", &self.only)
			.field("rules", &self.rules)
			.field("time_zone", &self.time_zone)
			.field("formats", &self.formats)
			.field("type_converters", &self.type_converters)
			.field("attribute_converters", &attributes)
			.field("keys", &self.keys)
			.field("include_properties", &self.include_properties)
			.field("max_depth", &self.max_depth)
			.field("drop_values", &self.drop_values)
			.field("strict_collections", &self.strict_collections)
			.finish()
	}
}
