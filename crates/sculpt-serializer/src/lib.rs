//! # sculpt-serializer
//!
//! Turns entity graphs into `serde_json::Value` trees under per-call include/exclude
//! rules, with an ordered converter chain and an optional depth limit.
//!
//! ## Overview
//!
//! - [`Serializable`]: what an entity exposes (attribute names, attribute values,
//!   declared rules and options)
//! - [`Options`]: call-time rules, formats, time zone, converters, depth limit,
//!   dropped values
//! - [`Serializer`]: the traversal engine
//! - [`serialize_collection`] and [`SerializeExt::to_value`]: convenience entry points
//!
//! ## Rules
//!
//! Rules are dotted attribute paths (see `sculpt_rules`). `only` rules switch a scope
//! into strict mode, additive rules keep everything not excluded. Entity-declared
//! rules are re-established at every level of nesting.
//!
//! ```rust
//! use sculpt_serializer::{BoxError, FieldValue, Options, Serializable, SerializeExt};
//! use serde_json::json;
//!
//! struct Author {
//!     name: String,
//!     email: String,
//! }
//!
//! impl Serializable for Author {
//!     fn field_names(&self) -> &'static [&'static str] {
//!         &["name", "email"]
//!     }
//!
//!     fn attribute(&self, name: &str) -> Result<FieldValue, BoxError> {
//!         match name {
//!             "name" => Ok(self.name.clone().into()),
//!             "email" => Ok(self.email.clone().into()),
//!             other => Err(format!("unknown attribute '{other}'").into()),
//!         }
//!     }
//! }
//!
//! struct Post {
//!     title: String,
//!     author: Author,
//! }
//!
//! impl Serializable for Post {
//!     fn field_names(&self) -> &'static [&'static str] {
//!         &["title", "author"]
//!     }
//!
//!     fn attribute(&self, name: &str) -> Result<FieldValue, BoxError> {
//!         match name {
//!             "title" => Ok(self.title.clone().into()),
//!             "author" => Ok(FieldValue::entity(Author {
//!                 name: self.author.name.clone(),
//!                 email: self.author.email.clone(),
//!             })),
//!             other => Err(format!("unknown attribute '{other}'").into()),
//!         }
//!     }
//! }
//!
//! let post = Post {
//!     title: "Hello".into(),
//!     author: Author { name: "Ann".into(), email: "ann@example.com".into() },
//! };
//!
//! let value = post.to_value(Options::new().rules(["-author.email"])).unwrap();
//! assert_eq!(value, json!({"title": "Hello", "author": {"name": "Ann"}}));
//! ```

pub mod converters;
pub mod entity;
pub mod error;
pub mod fields;
pub mod options;
pub mod serializer;
#[cfg(feature = "settings")]
pub mod settings;
pub mod value;

pub use converters::{AttributeConverter, TypeConverter, TypeMatcher};
pub use entity::Serializable;
pub use error::{BoxError, Result, SerializeError};
pub use fields::{AttributeCache, AttributeNames, discover};
pub use options::{Formats, Options};
pub use serializer::{SerializeExt, Serializer, serialize_collection};
#[cfg(feature = "settings")]
pub use settings::SerializerSettings;
pub use value::{Accessor, EnumMember, FieldValue, OpaqueValue, SerializableEnum, ValueKind};

pub use sculpt_rules::{Rule, RuleError, Schema};
