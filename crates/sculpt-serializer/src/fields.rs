//! Attribute discovery
//!
//! Resolves which attribute names of an entity are eligible for serialization.
//! Results are cached per entity type in a process-wide [`AttributeCache`].

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::entity::Serializable;

/// Discovered attribute names, shared between cache and callers
pub type AttributeNames = Arc<[&'static str]>;

static ATTRIBUTE_CACHE: Lazy<AttributeCache> = Lazy::new(AttributeCache::new);

/// Cache of discovered attribute names keyed by entity type
///
/// Reads take a shared lock; a miss takes the exclusive lock only to insert the
/// introspected names.
///
/// # Examples
///
/// ```
/// use sculpt_serializer::{AttributeCache, BoxError, FieldValue, Serializable};
///
/// struct Tag;
///
/// impl Serializable for Tag {
///     fn field_names(&self) -> &'static [&'static str] {
///         &["id", "label"]
///     }
///
///     fn attribute(&self, _name: &str) -> Result<FieldValue, BoxError> {
///         Ok(FieldValue::Null)
///     }
/// }
///
/// let cache = AttributeCache::new();
/// assert!(cache.get(&Tag, false).is_none());
///
/// let names = cache.get_or_discover(&Tag, false);
/// assert_eq!(&names[..], ["id", "label"]);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AttributeCache {
	entries: RwLock<HashMap<(TypeId, bool), AttributeNames>>,
}

impl AttributeCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide cache used by [`discover`]
	pub fn global() -> &'static AttributeCache {
		&ATTRIBUTE_CACHE
	}

	pub fn get(&self, entity: &dyn Serializable, include_properties: bool) -> Option<AttributeNames> {
		self.entries
			.read()
			.get(&(entity.entity_type(), include_properties))
			.cloned()
	}

	/// Return the cached names for the entity type, introspecting on a miss
	pub fn get_or_discover(
		&self,
		entity: &dyn Serializable,
		include_properties: bool,
	) -> AttributeNames {
		if let Some(names) = self.get(entity, include_properties) {
			return names;
		}

		tracing::debug!(
			entity = entity.entity_type_name(),
			include_properties,
			"Attribute cache miss"
		);
		let names = introspect(entity, include_properties);
		self.entries
			.write()
			.entry((entity.entity_type(), include_properties))
			.or_insert(names)
			.clone()
	}

	pub fn clear(&self) {
		self.entries.write().clear();
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

/// Attribute names eligible for serialization, in output order
///
/// An explicit [`serializable_keys`](Serializable::serializable_keys) list is
/// returned verbatim. Otherwise the field names are returned, followed by the
/// computed property names when `include_properties` is set.
pub fn discover(entity: &dyn Serializable, include_properties: bool) -> AttributeNames {
	if let Some(keys) = entity.serializable_keys() {
		return Arc::from(keys);
	}
	AttributeCache::global().get_or_discover(entity, include_properties)
}

fn introspect(entity: &dyn Serializable, include_properties: bool) -> AttributeNames {
	let mut names: Vec<&'static str> = Vec::new();
	let properties: &[&'static str] = if include_properties {
		entity.property_names()
	} else {
		&[]
	};

	for &name in entity.field_names().iter().chain(properties) {
		if !names.contains(&name) {
			names.push(name);
		}
	}
	names.into()
}
