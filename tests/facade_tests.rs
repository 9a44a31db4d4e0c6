//! Facade re-exports and the settings-driven entry point

use rstest::*;
use sculpt::prelude::*;
use serde_json::json;

struct Article {
	title: &'static str,
	draft: bool,
	tags: Vec<&'static str>,
}

impl Serializable for Article {
	fn field_names(&self) -> &'static [&'static str] {
		&["title", "draft", "tags"]
	}

	fn attribute(&self, name: &str) -> Result<FieldValue, BoxError> {
		match name {
			"title" => Ok(self.title.into()),
			"draft" => Ok(self.draft.into()),
			"tags" => Ok(self.tags.iter().map(|tag| FieldValue::from(*tag)).collect()),
			other => Err(format!("unknown attribute '{other}'").into()),
		}
	}
}

#[fixture]
fn article() -> Article {
	Article {
		title: "Rules",
		draft: false,
		tags: vec!["rust", "json"],
	}
}

#[rstest]
fn test_prelude_serializes_entity(article: Article) {
	let value = article.to_value(Options::new().rules(["-draft"])).unwrap();
	assert_eq!(value, json!({"title": "Rules", "tags": ["rust", "json"]}));
}

#[rstest]
fn test_rules_crate_is_reachable() {
	let rule: sculpt::Rule = "-tags.0".parse().unwrap();
	assert!(rule.is_negative());
	assert!(sculpt::rules::Rule::parse("a..b").is_err());
}

#[rstest]
fn test_settings_drive_serialization(article: Article) {
	let settings: SerializerSettings =
		serde_json::from_value(json!({"only": ["title", "draft"], "drop_values": [false]})).unwrap();

	let value = Serializer::new(settings.into_options())
		.serialize(&article)
		.unwrap();

	assert_eq!(value, json!({"title": "Rules"}));
}
