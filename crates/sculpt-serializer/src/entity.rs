//! Entity capability
//!
//! The serializer knows nothing about how an entity stores its data. An entity
//! lists its attribute names, reads one attribute on request and may declare
//! default rules and options that apply wherever it is serialized.

use std::any::TypeId;

use crate::error::BoxError;
use crate::options::Options;
use crate::value::FieldValue;

/// An entity the serializer can walk
///
/// Only [`field_names`](Serializable::field_names) and
/// [`attribute`](Serializable::attribute) are required. Name lists must depend on
/// the implementing type alone: they are cached per type, not per instance.
///
/// # Examples
///
/// ```
/// use sculpt_serializer::{BoxError, FieldValue, Options, Serializable, SerializeExt};
/// use serde_json::json;
///
/// struct User {
///     id: i64,
///     username: String,
///     password: String,
/// }
///
/// impl Serializable for User {
///     fn field_names(&self) -> &'static [&'static str] {
///         &["id", "username", "password"]
///     }
///
///     fn attribute(&self, name: &str) -> Result<FieldValue, BoxError> {
///         match name {
///             "id" => Ok(self.id.into()),
///             "username" => Ok(self.username.clone().into()),
///             "password" => Ok(self.password.clone().into()),
///             other => Err(format!("unknown attribute '{other}'").into()),
///         }
///     }
///
///     fn serialize_rules(&self) -> &'static [&'static str] {
///         &["-password"]
///     }
/// }
///
/// let user = User { id: 1, username: "alice".into(), password: "secret".into() };
/// let value = user.to_value(Options::new()).unwrap();
/// assert_eq!(value, json!({"id": 1, "username": "alice"}));
/// ```
pub trait Serializable: Send + Sync + 'static {
	/// Names of the stored fields, in output order
	fn field_names(&self) -> &'static [&'static str];

	/// Read the current value of one attribute
	///
	/// Called for discovered names and for names requested explicitly by a rule,
	/// so unknown names should produce an error.
	fn attribute(&self, name: &str) -> Result<FieldValue, BoxError>;

	/// Names of computed attributes, serialized only when the
	/// `include_properties` option is enabled
	fn property_names(&self) -> &'static [&'static str] {
		&[]
	}

	/// Explicit list of serializable attribute names
	///
	/// When present it replaces field and property discovery entirely.
	fn serializable_keys(&self) -> Option<&'static [&'static str]> {
		None
	}

	/// Exact rules applied wherever this entity is serialized
	fn serialize_only(&self) -> &'static [&'static str] {
		&[]
	}

	/// Additive rules applied wherever this entity is serialized
	fn serialize_rules(&self) -> &'static [&'static str] {
		&[]
	}

	/// Default options for this entity, overridden field by field by the caller
	///
	/// Rule fields of the returned options are not consulted; declare rules through
	/// [`serialize_only`](Serializable::serialize_only) and
	/// [`serialize_rules`](Serializable::serialize_rules).
	fn declared_options(&self) -> Options {
		Options::default()
	}

	fn entity_type(&self) -> TypeId {
		TypeId::of::<Self>()
	}

	fn entity_type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}
