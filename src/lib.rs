//! # Sculpt
//!
//! Rule-driven serialization of entity graphs into plain `serde_json::Value` trees.
//!
//! Sculpt lets every call decide which attributes of a graph of entities end up in the
//! output, using dotted include/exclude rules such as `"author.name"` or `"-password"`.
//! Entities declare their own defaults (rules, formats, converters); call-time options
//! refine them for a single serialization.
//!
//! ## Crates
//!
//! - [`rules`]: rule parsing, rule trees and per-scope schemas
//! - [`serializer`]: value model, converters and the traversal engine
//!
//! ## Feature Flags
//!
//! - `settings` (default) - deserializable [`SerializerSettings`] for config-driven policies
//!
//! ## Quick Example
//!
//! ```rust
//! use sculpt::prelude::*;
//! use serde_json::json;
//!
//! struct Account {
//!     id: i64,
//!     email: String,
//!     password: String,
//! }
//!
//! impl Serializable for Account {
//!     fn field_names(&self) -> &'static [&'static str] {
//!         &["id", "email", "password"]
//!     }
//!
//!     fn attribute(&self, name: &str) -> Result<FieldValue, BoxError> {
//!         match name {
//!             "id" => Ok(self.id.into()),
//!             "email" => Ok(self.email.clone().into()),
//!             "password" => Ok(self.password.clone().into()),
//!             other => Err(format!("unknown attribute '{other}'").into()),
//!         }
//!     }
//!
//!     fn serialize_rules(&self) -> &'static [&'static str] {
//!         &["-password"]
//!     }
//! }
//!
//! let account = Account { id: 7, email: "a@example.com".into(), password: "secret".into() };
//!
//! let value = account.to_value(Options::new()).unwrap();
//! assert_eq!(value, json!({"id": 7, "email": "a@example.com"}));
//!
//! let value = account.to_value(Options::new().only(["id"])).unwrap();
//! assert_eq!(value, json!({"id": 7}));
//! ```

pub use sculpt_rules as rules;
pub use sculpt_serializer as serializer;

// Re-export rules
pub use sculpt_rules::{Polarity, Rule, RuleError, Schema, Tree};

// Re-export the engine
pub use sculpt_serializer::{
	AttributeConverter, BoxError, Formats, Options, SerializeError, SerializeExt, Serializer,
	TypeConverter, TypeMatcher, serialize_collection,
};

// Re-export the value model
pub use sculpt_serializer::{
	Accessor, EnumMember, FieldValue, OpaqueValue, Serializable, SerializableEnum, ValueKind,
};

#[cfg(feature = "settings")]
pub use sculpt_serializer::SerializerSettings;

/// Commonly used types for implementing and serializing entities
pub mod prelude {
	pub use crate::{
		BoxError, FieldValue, Formats, Options, Serializable, SerializableEnum, SerializeError,
		SerializeExt, Serializer, TypeConverter, serialize_collection,
	};

	#[cfg(feature = "settings")]
	pub use crate::SerializerSettings;
}
