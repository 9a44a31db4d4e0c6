//! Rule schema
//!
//! The public query surface over a rule tree. A schema is built once per
//! serialization scope from up to four rule sources and is read-only afterwards.
//!
//! Layering order, later sources on top of earlier ones:
//!
//! 1. exact rules declared by the entity
//! 2. additive rules declared by the entity
//! 3. exact rules supplied by the caller (replaces 1 and 2 when present)
//! 4. additive rules supplied by the caller
//!
//! An exact source switches the schema into strict mode: only named attributes
//! are kept. Without one the schema is greedy: everything not excluded is kept.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;
use crate::rule::{DELIMITER, NEGATION, Rule};
use crate::tree::Tree;

/// Include/exclude rules for one serialization scope
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
	tree: Tree,
}

impl Schema {
	/// Create a greedy schema without rules
	pub fn new() -> Self {
		Self { tree: Tree::new() }
	}

	pub fn from_tree(tree: Tree) -> Self {
		Self { tree }
	}

	/// Build a schema from entity-declared and caller-supplied rule sources
	///
	/// # Examples
	///
	/// ```
	/// use sculpt_rules::Schema;
	///
	/// let schema = Schema::layered(&["id", "author"], &["-author.email"], &[] as &[&str], &["title"])
	///     .unwrap();
	/// assert!(!schema.is_greedy());
	/// assert!(schema.is_included("id"));
	/// assert!(schema.is_included("title"));
	/// assert!(!schema.is_included("body"));
	/// assert!(!schema.descend("author").is_included("email"));
	/// ```
	pub fn layered<A, B, C, D>(
		declared_only: &[A],
		declared_rules: &[B],
		call_only: &[C],
		call_rules: &[D],
	) -> Result<Self>
	where
		A: AsRef<str>,
		B: AsRef<str>,
		C: AsRef<str>,
		D: AsRef<str>,
	{
		let mut schema = Schema::new();
		schema.ingest_exact(declared_only)?;
		schema.ingest_extend(declared_rules)?;
		schema.ingest_exact(call_only)?;
		schema.ingest_extend(call_rules)?;
		Ok(schema)
	}

	/// Replace every rule of this scope and switch it into strict mode
	///
	/// An empty source counts as "not supplied" and leaves the schema untouched.
	pub fn ingest_exact<S: AsRef<str>>(&mut self, rules: &[S]) -> Result<()> {
		if rules.is_empty() {
			return Ok(());
		}

		let rules = Rule::parse_all(rules)?;
		let mut tree = Tree::new();
		tree.force_strict();
		for rule in &rules {
			tree.apply(rule);
		}
		self.tree = tree;

		tracing::debug!(rules = rules.len(), schema = %self, "Ingested exact rules");
		Ok(())
	}

	/// Add rules on top of the current ones without changing the mode
	pub fn ingest_extend<S: AsRef<str>>(&mut self, rules: &[S]) -> Result<()> {
		if rules.is_empty() {
			return Ok(());
		}

		let rules = Rule::parse_all(rules)?;
		for rule in &rules {
			self.tree.apply(rule);
		}

		tracing::debug!(rules = rules.len(), schema = %self, "Ingested additive rules");
		Ok(())
	}

	/// Overlay a schema inherited from an enclosing scope
	///
	/// A strict inherited schema acts as a caller-supplied exact source and
	/// replaces the rules of this scope. The rules of a greedy one are merged on top
	/// of the rules of this scope without changing its mode.
	pub fn merge(&mut self, inherited: &Schema) {
		if inherited.is_greedy() {
			self.tree.merge_children(&inherited.tree);
		} else {
			self.tree = inherited.tree.clone();
		}
	}

	/// Whether attribute `name` of this scope belongs to the output
	pub fn is_included(&self, name: &str) -> bool {
		self.tree.is_included(name)
	}

	/// Attributes named directly by a positive rule
	pub fn top_level_keys(&self) -> BTreeSet<String> {
		self.tree
			.children()
			.filter(|(_, node)| node.is_explicitly_included())
			.map(|(name, _)| name.to_string())
			.collect()
	}

	/// Schema for the nested scope under attribute `name`
	///
	/// Returns the rules written for `name` when there are any, otherwise an empty
	/// schema in the current mode of this one.
	pub fn descend(&self, name: &str) -> Schema {
		match self.tree.child(name) {
			Some(node) => Schema::from_tree(node.clone()),
			None if self.tree.is_greedy() => Schema::new(),
			None => Schema::from_tree(Tree::strict()),
		}
	}

	pub fn is_greedy(&self) -> bool {
		self.tree.is_greedy()
	}

	pub fn tree(&self) -> &Tree {
		&self.tree
	}

	/// Textual rules equivalent to the explicit marks of the tree, sorted by path
	pub fn rules(&self) -> Vec<String> {
		let mut rules = Vec::new();
		collect_rules(&self.tree, &mut Vec::new(), &mut rules);
		rules
	}
}

fn collect_rules<'a>(tree: &'a Tree, path: &mut Vec<&'a str>, out: &mut Vec<String>) {
	let mut buf = [0; 4];
	let delimiter: &str = DELIMITER.encode_utf8(&mut buf);
	for (segment, node) in tree.children() {
		path.push(segment);
		let joined = path.join(delimiter);
		if node.is_explicitly_included() {
			out.push(joined.clone());
		}
		if node.is_explicitly_excluded() {
			out.push(format!("{}{}", NEGATION, joined));
		}
		collect_rules(node, path, out);
		path.pop();
	}
}

impl fmt::Display for Schema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Schema(greedy={}, rules=[{}])",
			self.is_greedy(),
			self.rules().join(", ")
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const NONE: &[&str] = &[];

	fn schema(only: &[&str], extend: &[&str]) -> Schema {
		let mut schema = Schema::new();
		schema.ingest_exact(only).unwrap();
		schema.ingest_extend(extend).unwrap();
		schema
	}

	#[rstest]
	#[case(NONE, &["key.another"], &["key"])]
	#[case(NONE, &["key.another", "-key"], &["key"])]
	#[case(NONE, &["key.another", "-key.another"], &["key"])]
	#[case(&["key.another", "-key.another"], NONE, &["key"])]
	#[case(&["-key.another"], NONE, NONE)]
	#[case(&["key.another"], &["another"], &["another", "key"])]
	fn test_top_level_keys(#[case] only: &[&str], #[case] extend: &[&str], #[case] keys: &[&str]) {
		let keys: BTreeSet<String> = keys.iter().map(|k| k.to_string()).collect();
		assert_eq!(schema(only, extend).top_level_keys(), keys);
	}

	#[rstest]
	#[case(NONE, &["key.another"], true)]
	#[case(NONE, &["key.another", "-key"], true)]
	#[case(&["key.another", "-key.another"], NONE, false)]
	#[case(&["-key.another"], NONE, false)]
	#[case(&["key.another"], &["another"], false)]
	fn test_is_greedy(#[case] only: &[&str], #[case] extend: &[&str], #[case] expected: bool) {
		assert_eq!(schema(only, extend).is_greedy(), expected);
	}

	#[rstest]
	#[case(NONE, &["-key"], "key", false)]
	#[case(NONE, &["another"], "key", true)]
	#[case(NONE, &["-another"], "key", true)]
	#[case(NONE, &["-key.another"], "key", true)]
	#[case(NONE, &["key", "-key"], "key", true)]
	#[case(&["-key"], NONE, "key", false)]
	#[case(&["-key"], NONE, "another", false)]
	#[case(&["key"], NONE, "key", true)]
	#[case(&["key.another"], NONE, "key", true)]
	#[case(&["another"], NONE, "key", false)]
	fn test_is_included(
		#[case] only: &[&str],
		#[case] extend: &[&str],
		#[case] key: &str,
		#[case] expected: bool,
	) {
		assert_eq!(schema(only, extend).is_included(key), expected);
	}

	#[test]
	fn test_exact_rules_replace_previous_ones() {
		let mut schema = schema(NONE, &["-a", "b.c"]);
		schema.ingest_exact(&["d"]).unwrap();

		assert_eq!(schema.rules(), vec!["d"]);
		assert!(!schema.is_included("b"));
	}

	#[test]
	fn test_empty_exact_source_is_ignored() {
		let mut schema = schema(NONE, &["-a"]);
		schema.ingest_exact(NONE).unwrap();

		assert!(schema.is_greedy());
		assert!(!schema.is_included("a"));
	}

	#[test]
	fn test_extend_after_exact_keeps_strict_mode() {
		let schema = schema(&["o.o"], &["o.another", "-o.o.o"]);

		assert!(!schema.is_greedy());
		let o = schema.descend("o");
		assert!(!o.is_greedy());
		assert!(o.is_included("o"));
		assert!(o.is_included("another"));
		assert!(!o.is_included("unmentioned"));
		assert!(!o.descend("o").is_included("o"));
	}

	#[test]
	fn test_descend_unmentioned_follows_parent_mode() {
		assert!(schema(NONE, &["-a"]).descend("b").is_greedy());
		assert!(!schema(&["a"], NONE).descend("b").is_greedy());
	}

	#[test]
	fn test_descend_named_keeps_its_rules() {
		let schema = schema(&["x", "-x.y"], NONE);

		let x = schema.descend("x");
		assert!(x.is_greedy());
		assert!(!x.is_included("y"));
		assert!(x.is_included("z"));
	}

	#[test]
	fn test_layered_call_exact_replaces_declared_rules() {
		let schema = Schema::layered(&["a"], &["b"], &["c"], &["d"]).unwrap();

		assert_eq!(schema.rules(), vec!["c", "d"]);
	}

	#[test]
	fn test_layered_malformed_rule() {
		let result = Schema::layered(NONE, &["a..b"], NONE, NONE);
		assert!(result.is_err());
	}

	#[test]
	fn test_merge_strict_inherited_replaces() {
		let mut schema = schema(NONE, &["-a"]);
		schema.merge(&Schema::layered(NONE, NONE, &["b"], NONE).unwrap());

		assert!(!schema.is_greedy());
		assert_eq!(schema.rules(), vec!["b"]);
	}

	#[test]
	fn test_merge_greedy_inherited_extends() {
		let mut schema = schema(&["a"], NONE);
		schema.merge(&schema_from_extend(&["b", "-a.c"]));

		assert!(!schema.is_greedy());
		assert!(schema.is_included("a"));
		assert!(schema.is_included("b"));
		assert!(!schema.descend("a").is_included("c"));
	}

	#[test]
	fn test_merge_greedy_inherited_keeps_strict_mode() {
		let parent = schema(NONE, &["author.b.c"]);
		let mut author = schema(&["x"], NONE);
		author.merge(&parent.descend("author"));

		assert!(!author.is_greedy());
		assert!(author.is_included("x"));
		assert!(author.is_included("b"));
		assert!(!author.is_included("y"));
	}

	fn schema_from_extend(rules: &[&str]) -> Schema {
		schema(NONE, rules)
	}

	#[test]
	fn test_display() {
		let schema = schema(&["a", "-a.b"], NONE);
		assert_eq!(schema.to_string(), "Schema(greedy=false, rules=[a, -a.b])");
	}
}
