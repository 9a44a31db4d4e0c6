//! Rule tree
//!
//! Rules are folded into a tree keyed by path segment. Every node records whether
//! it was named by a positive rule, by a negative rule, and what happens to the
//! children nobody mentioned (`greedy`: keep them, strict: drop them).

use std::collections::BTreeMap;

use crate::rule::{Polarity, Rule};

/// A node of the rule tree, owning its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
	include: bool,
	exclude: bool,
	greedy: bool,
	children: BTreeMap<String, Tree>,
}

impl Tree {
	/// Create an empty greedy tree (everything is included unless excluded)
	pub fn new() -> Self {
		Self::with_mode(true)
	}

	/// Create an empty strict tree (nothing is included unless named)
	pub fn strict() -> Self {
		Self::with_mode(false)
	}

	fn with_mode(greedy: bool) -> Self {
		Self {
			include: false,
			exclude: false,
			greedy,
			children: BTreeMap::new(),
		}
	}

	/// Fold one rule into the tree
	///
	/// Missing nodes along the path are created with the mode of their parent.
	/// A positive rule marks the whole path as included and selects the complete
	/// subtree under its last segment; a negative rule marks only its last segment.
	///
	/// # Examples
	///
	/// ```
	/// use sculpt_rules::{Rule, Tree};
	///
	/// let mut tree = Tree::strict();
	/// tree.apply(&Rule::parse("author.name").unwrap());
	///
	/// assert!(tree.is_included("author"));
	/// let author = tree.child("author").unwrap();
	/// assert!(!author.is_greedy());
	/// assert!(author.is_included("name"));
	/// assert!(!author.is_included("email"));
	/// ```
	pub fn apply(&mut self, rule: &Rule) {
		let last = rule.segments().len() - 1;
		let mut node = self;
		for (i, segment) in rule.segments().iter().enumerate() {
			let greedy = node.greedy;
			node = node
				.children
				.entry(segment.clone())
				.or_insert_with(|| Tree::with_mode(greedy));

			match rule.polarity() {
				Polarity::Include => {
					node.include = true;
					if i == last {
						node.greedy = true;
					}
				}
				Polarity::Exclude if i == last => node.exclude = true,
				Polarity::Exclude => {}
			}
		}
	}

	/// Union another tree into this one, node by node
	///
	/// Explicit flags accumulate; when a node ends up both included and excluded the
	/// inclusion wins at query time, whatever the merge order. A node the other tree
	/// selects as a whole becomes greedy here too. The mode of `self` is otherwise
	/// kept.
	pub fn merge(&mut self, other: &Tree) {
		self.include |= other.include;
		self.exclude |= other.exclude;
		if other.include && other.greedy {
			self.greedy = true;
		}
		self.merge_children(other);
	}

	/// Union the children of another tree into this one, leaving the flags of
	/// this node untouched
	pub fn merge_children(&mut self, other: &Tree) {
		for (segment, subtree) in &other.children {
			match self.children.get_mut(segment) {
				Some(existing) => existing.merge(subtree),
				None => {
					self.children.insert(segment.clone(), subtree.clone());
				}
			}
		}
	}

	/// Switch this node and every node below it to strict mode
	///
	/// Nodes created later by [`Tree::apply`] inherit the strictness from their parent.
	pub fn force_strict(&mut self) {
		self.greedy = false;
		for subtree in self.children.values_mut() {
			subtree.force_strict();
		}
	}

	/// Whether the child attribute `segment` belongs to the output
	pub fn is_included(&self, segment: &str) -> bool {
		match self.children.get(segment) {
			Some(child) if child.include => true,
			Some(child) if child.exclude => false,
			_ => self.greedy,
		}
	}

	pub fn child(&self, segment: &str) -> Option<&Tree> {
		self.children.get(segment)
	}

	pub fn children(&self) -> impl Iterator<Item = (&str, &Tree)> {
		self.children.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn is_greedy(&self) -> bool {
		self.greedy
	}

	/// Named by a positive rule
	pub fn is_explicitly_included(&self) -> bool {
		self.include
	}

	/// Named by a negative rule
	pub fn is_explicitly_excluded(&self) -> bool {
		self.exclude
	}

	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}
}

impl Default for Tree {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn rule(text: &str) -> Rule {
		Rule::parse(text).unwrap()
	}

	fn tree_with(base: Tree, rules: &[&str]) -> Tree {
		let mut tree = base;
		for r in rules {
			tree.apply(&rule(r));
		}
		tree
	}

	#[test]
	fn test_tree_defaults() {
		let tree = Tree::new();
		assert!(tree.is_greedy());
		assert!(!tree.is_explicitly_included());
		assert!(!tree.is_explicitly_excluded());
		assert!(tree.is_leaf());
		assert!(tree.is_included("anything"));

		let strict = Tree::strict();
		assert!(!strict.is_included("anything"));
	}

	#[test]
	fn test_apply_marks_path() {
		let tree = tree_with(Tree::new(), &["key.another"]);

		let key = tree.child("key").unwrap();
		assert!(key.is_explicitly_included());
		assert!(key.is_greedy());
		let another = key.child("another").unwrap();
		assert!(another.is_explicitly_included());
		assert!(another.is_leaf());
	}

	#[test]
	fn test_negative_rule_marks_only_last_segment() {
		let tree = tree_with(Tree::new(), &["-key.another"]);

		let key = tree.child("key").unwrap();
		assert!(!key.is_explicitly_included());
		assert!(!key.is_explicitly_excluded());
		assert!(key.child("another").unwrap().is_explicitly_excluded());
		assert!(tree.is_included("key"));
		assert!(!key.is_included("another"));
	}

	#[rstest]
	#[case(&["key.another", "key"])]
	#[case(&["key", "key.another"])]
	fn test_strict_whole_selection_is_order_independent(#[case] rules: &[&str]) {
		let tree = tree_with(Tree::strict(), rules);

		let key = tree.child("key").unwrap();
		assert!(key.is_greedy());
		assert!(key.is_included("unmentioned"));
	}

	#[test]
	fn test_strict_intermediate_nodes_stay_strict() {
		let tree = tree_with(Tree::strict(), &["key.another.leaf"]);

		let key = tree.child("key").unwrap();
		assert!(!key.is_greedy());
		let another = key.child("another").unwrap();
		assert!(!another.is_greedy());
		assert!(another.child("leaf").unwrap().is_greedy());
	}

	#[rstest]
	#[case(&["x", "-x"])]
	#[case(&["-x", "x"])]
	fn test_include_wins_within_one_tree(#[case] rules: &[&str]) {
		let tree = tree_with(Tree::new(), rules);
		assert!(tree.is_included("x"));
	}

	#[test]
	fn test_include_wins_regardless_of_merge_order() {
		let positive = tree_with(Tree::strict(), &["x"]);
		let negative = tree_with(Tree::strict(), &["-x"]);

		let mut first = positive.clone();
		first.merge(&negative);
		let mut second = negative.clone();
		second.merge(&positive);

		assert!(first.is_included("x"));
		assert!(second.is_included("x"));
	}

	#[test]
	fn test_merge_unions_children() {
		let mut tree = tree_with(Tree::strict(), &["key1"]);
		let other = tree_with(Tree::new(), &["-key1.key2", "key1.key3"]);

		tree.merge(&other);

		assert!(!tree.is_greedy());
		let key1 = tree.child("key1").unwrap();
		assert!(key1.is_explicitly_included());
		assert!(key1.child("key2").unwrap().is_explicitly_excluded());
		assert!(key1.child("key3").unwrap().is_explicitly_included());
		assert!(!key1.is_included("key2"));
	}

	#[test]
	fn test_merge_keeps_receiving_mode() {
		let mut tree = Tree::new();
		tree.merge(&Tree::strict());
		assert!(tree.is_greedy());

		let mut strict = Tree::strict();
		strict.merge(&Tree::new());
		assert!(!strict.is_greedy());
	}

	#[test]
	fn test_merge_children_keeps_own_flags() {
		let mut tree = Tree::strict();
		let mut other = tree_with(Tree::new(), &["a.b"]);
		other.include = true;

		tree.merge_children(&other);

		assert!(!tree.is_greedy());
		assert!(!tree.is_explicitly_included());
		assert!(tree.is_included("a"));
		assert!(!tree.is_included("c"));
	}

	#[test]
	fn test_force_strict_reaches_every_node() {
		let mut tree = tree_with(Tree::new(), &["a.b.c", "d"]);
		tree.force_strict();

		fn check(tree: &Tree) {
			assert!(!tree.is_greedy());
			for (_, child) in tree.children() {
				check(child);
			}
		}
		check(&tree);
	}

	#[test]
	fn test_nodes_created_after_force_strict_inherit_it() {
		let mut tree = Tree::new();
		tree.force_strict();
		tree.apply(&rule("-a.b"));

		assert!(!tree.child("a").unwrap().is_greedy());
		assert!(!tree.is_included("a"));
	}
}
