//! # sculpt-rules
//!
//! Path-based include/exclude rules deciding which attributes of an entity graph
//! are serialized.
//!
//! ## Rule syntax
//!
//! - `name` keeps attribute `name`
//! - `-name` drops attribute `name`
//! - `author.name` addresses attribute `name` of the nested value under `author`
//!
//! ## Modes
//!
//! - **Greedy**: every attribute is kept unless a rule drops it
//! - **Strict**: only named attributes are kept; entered by supplying exact rules
//!
//! When a path is both kept and dropped, keeping wins.
//!
//! ## Examples
//!
//! ```rust
//! use sculpt_rules::Schema;
//!
//! let mut schema = Schema::new();
//! schema.ingest_extend(&["-password", "profile.avatar"]).unwrap();
//!
//! assert!(schema.is_included("username"));
//! assert!(!schema.is_included("password"));
//! assert!(schema.descend("profile").is_included("avatar"));
//! ```

pub mod error;
pub mod rule;
pub mod schema;
pub mod tree;

pub use error::{Result, RuleError};
pub use rule::{DELIMITER, NEGATION, Polarity, Rule};
pub use schema::Schema;
pub use tree::Tree;
