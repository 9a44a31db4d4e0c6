//! Serializer settings loaded from configuration
//!
//! [`SerializerSettings`] is the data-only part of [`Options`]: everything except
//! converters, which are code. Deployments can keep a default serialization policy
//! in a JSON or TOML file and turn it into options at startup.

use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

use crate::options::{Formats, Options};

/// Deserializable serialization policy
///
/// # Examples
///
/// ```
/// use sculpt_serializer::SerializerSettings;
///
/// let settings: SerializerSettings = serde_json::from_str(r#"{
///     "rules": ["-password"],
///     "time_zone": "Europe/Paris",
///     "formats": {"date": "%d/%m/%Y"},
///     "max_depth": 2,
///     "drop_values": [null]
/// }"#).unwrap();
///
/// let options = settings.into_options();
/// assert_eq!(options.extend_rules(), ["-password"]);
/// assert_eq!(options.max_depth_limit(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerSettings {
	pub only: Vec<String>,
	pub rules: Vec<String>,
	pub time_zone: Option<Tz>,
	pub formats: Formats,
	pub keys: Option<Vec<String>>,
	pub include_properties: Option<bool>,
	pub max_depth: Option<usize>,
	pub drop_values: Option<Vec<Value>>,
	pub strict_collections: Option<bool>,
}

impl SerializerSettings {
	pub fn into_options(self) -> Options {
		Options {
			only: self.only,
			rules: self.rules,
			time_zone: self.time_zone,
			formats: self.formats,
			keys: self.keys,
			include_properties: self.include_properties,
			max_depth: self.max_depth,
			drop_values: self.drop_values,
			strict_collections: self.strict_collections,
			..Options::default()
		}
	}
}

impl From<SerializerSettings> for Options {
	fn from(settings: SerializerSettings) -> Self {
		settings.into_options()
	}
}
