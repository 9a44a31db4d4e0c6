//! Traversal engine
//!
//! Walks an entity graph and assembles a `serde_json::Value` tree. Every entity and
//! mapping resolves the rule schema of its scope once; nested entities, mappings and
//! sequences reached through an attribute are serialized in a forked scope whose
//! schema is the parent's schema descended by the attribute name, one level deeper.
//! Sequence elements share the scope of their sequence.

use std::collections::BTreeMap;
use std::sync::Arc;

use sculpt_rules::Schema;
use serde_json::{Map, Value};

use crate::converters::convert_builtin;
use crate::entity::Serializable;
use crate::error::{BoxError, Result, SerializeError};
use crate::fields::discover;
use crate::options::Options;
use crate::value::FieldValue;

const NO_RULES: &[&str] = &[];

/// Rules and options inherited by a value before its own schema is resolved
#[derive(Debug, Clone)]
struct Scope {
	/// `None` at the root, where the call-time rules still live in `options`
	inherited: Option<Schema>,
	options: Arc<Options>,
	depth: usize,
}

/// A scope whose schema has been resolved for one entity or mapping
#[derive(Debug)]
struct Frame {
	schema: Schema,
	options: Arc<Options>,
	depth: usize,
}

impl Scope {
	fn root(options: &Options) -> Self {
		Self {
			inherited: None,
			options: Arc::new(options.clone()),
			depth: 0,
		}
	}

	/// Resolve the schema of an entity or mapping entered through this scope
	///
	/// At the root the declared rules are layered under the call-time rules. Below
	/// the root the declared rules are re-established and the inherited schema is
	/// merged over them.
	fn enter<A, B>(&self, declared_only: &[A], declared_rules: &[B], options: Arc<Options>) -> Result<Frame>
	where
		A: AsRef<str>,
		B: AsRef<str>,
	{
		let schema = match &self.inherited {
			None => Schema::layered(
				declared_only,
				declared_rules,
				options.only_rules(),
				options.extend_rules(),
			)?,
			Some(inherited) => {
				let mut schema = Schema::layered(declared_only, declared_rules, NO_RULES, NO_RULES)?;
				schema.merge(inherited);
				schema
			}
		};

		Ok(Frame {
			schema,
			options,
			depth: self.depth,
		})
	}
}

impl Frame {
	/// Scope for the value under attribute `name`, or `None` when the value is cut
	/// off by the depth limit
	///
	/// Only values that reach an entity are cut off; mappings and sequences of
	/// plain values are kept at any depth. An entity reached directly also has its
	/// own declared limit checked when no inherited limit applies.
	fn fork(&self, name: &str, value: &FieldValue) -> Option<Scope> {
		let depth = self.depth + 1;
		let max_depth = self.options.max_depth_limit().or_else(|| match value {
			FieldValue::Entity(entity) => entity.declared_options().max_depth_limit(),
			_ => None,
		});
		if let Some(max_depth) = max_depth {
			if depth > max_depth && value.reaches_entity() {
				tracing::debug!(attribute = name, depth, max_depth, "Depth limit reached, omitting attribute");
				return None;
			}
		}

		tracing::trace!(attribute = name, kind = %value.kind(), depth, "Forking scope");
		Some(Scope {
			inherited: Some(self.schema.descend(name)),
			options: Arc::new(self.options.for_nested()),
			depth,
		})
	}
}

/// Serializes entity graphs under one set of options
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use sculpt_serializer::{FieldValue, Options, Serializer};
/// use serde_json::json;
///
/// let mut map = BTreeMap::new();
/// map.insert("name".to_string(), FieldValue::from("sculpt"));
/// map.insert("token".to_string(), FieldValue::from("hidden"));
///
/// let serializer = Serializer::new(Options::new().rules(["-token"]));
/// let value = serializer.serialize_value(FieldValue::Map(map)).unwrap();
/// assert_eq!(value, json!({"name": "sculpt"}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Serializer {
	options: Options,
}

impl Serializer {
	pub fn new(options: Options) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	/// Serialize an entity into a JSON object
	pub fn serialize(&self, entity: &dyn Serializable) -> Result<Value> {
		let scope = Scope::root(&self.options);
		self.serialize_entity(entity, &scope)
	}

	/// Serialize any value, applying the call-time rules to a root mapping
	///
	/// A root sequence behaves like a sequence attribute: its elements share the
	/// root scope and unserializable ones are skipped.
	pub fn serialize_value(&self, value: FieldValue) -> Result<Value> {
		let scope = Scope::root(&self.options);
		let value = resolve(value).map_err(|source| SerializeError::attribute("<root>", source))?;
		self.convert_shared(value, &scope)
	}

	fn serialize_entity(&self, entity: &dyn Serializable, scope: &Scope) -> Result<Value> {
		let declared = entity.declared_options();
		let options = Arc::new(scope.options.layer(&declared));
		let frame = scope.enter(entity.serialize_only(), entity.serialize_rules(), options)?;

		let introspected;
		let names: Vec<&str> = match frame.options.explicit_keys() {
			Some(keys) => keys.iter().map(String::as_str).collect(),
			None => {
				introspected = discover(entity, frame.options.includes_properties());
				introspected.iter().copied().collect()
			}
		};

		// Attributes named by a rule but not discovered, e.g. computed accessors
		let requested: Vec<String> = frame
			.schema
			.top_level_keys()
			.into_iter()
			.filter(|key| !names.contains(&key.as_str()))
			.collect();

		tracing::trace!(
			entity = entity.entity_type_name(),
			depth = frame.depth,
			schema = %frame.schema,
			"Serializing entity"
		);

		let mut out = Map::new();
		for name in names.iter().copied().chain(requested.iter().map(String::as_str)) {
			if !frame.schema.is_included(name) {
				tracing::trace!(attribute = name, "Skipping excluded attribute");
				continue;
			}

			let raw = entity
				.attribute(name)
				.map_err(|source| SerializeError::attribute(name, source))?;
			if let Some(value) = self.serialize_attribute(name, raw, &frame)? {
				if frame.options.drops(&value) {
					tracing::trace!(attribute = name, "Dropping attribute by value");
					continue;
				}
				out.insert(name.to_string(), value);
			}
		}
		Ok(Value::Object(out))
	}

	fn serialize_map(&self, map: BTreeMap<String, FieldValue>, scope: &Scope) -> Result<Value> {
		let frame = scope.enter(NO_RULES, NO_RULES, Arc::clone(&scope.options))?;

		let mut out = Map::new();
		for (key, raw) in map {
			if !frame.schema.is_included(&key) {
				tracing::trace!(key = key.as_str(), "Skipping excluded key");
				continue;
			}
			if let Some(value) = self.serialize_attribute(&key, raw, &frame)? {
				if frame.options.drops(&value) {
					tracing::trace!(key = key.as_str(), "Dropping key by value");
					continue;
				}
				out.insert(key, value);
			}
		}
		Ok(Value::Object(out))
	}

	fn serialize_seq(&self, items: Vec<FieldValue>, scope: &Scope) -> Result<Value> {
		let mut out = Vec::with_capacity(items.len());
		for (index, item) in items.into_iter().enumerate() {
			let converted = resolve(item)
				.map_err(|source| SerializeError::attribute(&format!("[{index}]"), source))
				.and_then(|item| self.convert_shared(item, scope));
			match converted {
				Ok(value) => out.push(value),
				Err(err) if err.is_unserializable() && !scope.options.is_strict_collections() => {
					tracing::debug!(index, error = %err, "Skipping unserializable sequence element");
				}
				Err(err) => return Err(err),
			}
		}
		Ok(Value::Array(out))
	}

	/// Convert the value of one attribute; `None` means the attribute is omitted
	fn serialize_attribute(&self, name: &str, raw: FieldValue, frame: &Frame) -> Result<Option<Value>> {
		let value = resolve(raw).map_err(|source| SerializeError::attribute(name, source))?;

		if let Some(converter) = frame.options.attribute_converters.get(name) {
			return converter
				.convert(&value)
				.map(Some)
				.map_err(|source| SerializeError::converter(Some(name), source));
		}

		if let Some(converted) = self.convert_scalar(&value, Some(name), &frame.options) {
			return converted.map(Some);
		}

		if !value.is_nested() {
			return Err(SerializeError::unserializable(value.type_name()));
		}
		match frame.fork(name, &value) {
			Some(scope) => self.convert_nested(value, &scope).map(Some),
			None => Ok(None),
		}
	}

	/// Convert a value that lives in `scope` itself: a sequence element or the root
	fn convert_shared(&self, value: FieldValue, scope: &Scope) -> Result<Value> {
		match self.convert_scalar(&value, None, &scope.options) {
			Some(converted) => converted,
			None => self.convert_nested(value, scope),
		}
	}

	/// Custom type converters, then the built-in ones
	fn convert_scalar(
		&self,
		value: &FieldValue,
		attribute: Option<&str>,
		options: &Options,
	) -> Option<Result<Value>> {
		if let Some(converter) = options
			.type_converters
			.iter()
			.find(|converter| converter.matches(value))
		{
			return Some(
				converter
					.convert(value)
					.map_err(|source| SerializeError::converter(attribute, source)),
			);
		}
		convert_builtin(value, options)
	}

	fn convert_nested(&self, value: FieldValue, scope: &Scope) -> Result<Value> {
		match value {
			FieldValue::Map(map) => self.serialize_map(map, scope),
			FieldValue::Seq(items) => self.serialize_seq(items, scope),
			FieldValue::Entity(entity) => self.serialize_entity(entity.as_ref(), scope),
			other => Err(SerializeError::unserializable(other.type_name())),
		}
	}
}

/// Invoke deferred accessors until a concrete value remains
fn resolve(mut value: FieldValue) -> std::result::Result<FieldValue, BoxError> {
	while let FieldValue::Deferred(accessor) = value {
		value = accessor.call()?;
	}
	Ok(value)
}

/// Serialize every entity of a collection under one shared set of options
///
/// # Examples
///
/// ```
/// use sculpt_serializer::{BoxError, FieldValue, Options, Serializable, serialize_collection};
/// use serde_json::json;
///
/// struct Point(i64, i64);
///
/// impl Serializable for Point {
///     fn field_names(&self) -> &'static [&'static str] {
///         &["x", "y"]
///     }
///
///     fn attribute(&self, name: &str) -> Result<FieldValue, BoxError> {
///         match name {
///             "x" => Ok(self.0.into()),
///             "y" => Ok(self.1.into()),
///             other => Err(format!("unknown attribute '{other}'").into()),
///         }
///     }
/// }
///
/// let points = vec![Point(1, 2), Point(3, 4)];
/// let values = serialize_collection(&points, Options::new().only(["x"])).unwrap();
/// assert_eq!(values, vec![json!({"x": 1}), json!({"x": 3})]);
/// ```
pub fn serialize_collection<'a, I, E>(entities: I, options: Options) -> Result<Vec<Value>>
where
	I: IntoIterator<Item = &'a E>,
	E: Serializable,
{
	let serializer = Serializer::new(options);
	entities
		.into_iter()
		.map(|entity| serializer.serialize(entity))
		.collect()
}

/// `to_value` on every serializable entity
pub trait SerializeExt: Serializable + Sized {
	fn to_value(&self, options: Options) -> Result<Value> {
		Serializer::new(options).serialize(self)
	}
}

impl<T: Serializable> SerializeExt for T {}
