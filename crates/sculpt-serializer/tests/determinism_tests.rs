//! Repeated serialization with identical options is byte-for-byte identical


use fixtures::*;
use proptest::prelude::*;
use sculpt_serializer::{FieldValue, Options, SerializeExt, Serializer};

const RULE_POOL: &[&str] = &[
	"id",
	"-id",
	"username",
	"profile",
	"-profile.bio",
	"profile.website",
	"comments",
	"comments.text",
	"-comments.id",
	"comments.note",
	"prefs",
	"-prefs.theme",
	"display_name",
	"password",
];

fn rules() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec(prop::sample::select(RULE_POOL), 0..5)
		.prop_map(|rules| rules.into_iter().map(str::to_string).collect())
}

proptest! {
	#[test]
	fn prop_serialization_is_deterministic(
		only in rules(),
		extend in rules(),
		max_depth in prop::option::of(0usize..3),
	) {
		let mut options = Options::new().only(only).rules(extend);
		if let Some(depth) = max_depth {
			options = options.max_depth(depth);
		}

		let first = serde_json::to_string(&user().to_value(options.clone()).unwrap()).unwrap();
		let second = serde_json::to_string(&user().to_value(options).unwrap()).unwrap();
		prop_assert_eq!(first, second);
	}

	#[test]
	fn prop_sequence_keeps_convertible_elements_in_order(
		mask in prop::collection::vec(any::<bool>(), 0..12),
	) {
		let items: Vec<FieldValue> = mask
			.iter()
			.enumerate()
			.map(|(i, convertible)| {
				if *convertible {
					FieldValue::from(i as u64)
				} else {
					FieldValue::opaque(std::time::Instant::now())
				}
			})
			.collect();
		let expected: Vec<serde_json::Value> = mask
			.iter()
			.enumerate()
			.filter(|(_, convertible)| **convertible)
			.map(|(i, _)| serde_json::json!(i))
			.collect();

		let value = Serializer::new(Options::new())
			.serialize_value(FieldValue::Seq(items))
			.unwrap();
		prop_assert_eq!(value, serde_json::Value::Array(expected));
	}
}
