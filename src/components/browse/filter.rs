use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::catalog::{NodeType, TreeNode};

/// Set of node types to keep. Empty means no filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeFilter {
	types: BTreeSet<NodeType>,
}

impl TypeFilter {
	/// No filtering.
	pub fn all() -> Self {
		Self::default()
	}

	/// Keeps `node_type` and the ancestors leading to it.
	pub fn only(node_type: NodeType) -> Self {
		Self {
			types: BTreeSet::from([node_type]),
		}
	}

	/// True when nothing is filtered out.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// True when `node_type` is one of the kept types.
	pub fn allows(&self, node_type: NodeType) -> bool {
		self.types.contains(&node_type)
	}

	/// The single active type, if exactly one is set.
	pub fn single(&self) -> Option<NodeType> {
		match self.types.len() {
			1 => self.types.first().copied(),
			_ => None,
		}
	}
}

impl FromIterator<NodeType> for TypeFilter {
	fn from_iter<I: IntoIterator<Item = NodeType>>(iter: I) -> Self {
		Self {
			types: iter.into_iter().collect(),
		}
	}
}

/// Prunes `forest` to nodes whose type is allowed plus their ancestor chains.
///
/// A kept node keeps only its kept children. An empty filter borrows the
/// input unchanged.
pub fn filter_forest<'a>(forest: &'a [TreeNode], filter: &TypeFilter) -> Cow<'a, [TreeNode]> {
	if filter.is_empty() {
		return Cow::Borrowed(forest);
	}
	Cow::Owned(
		forest
			.iter()
			.filter_map(|node| filter_node(node, filter))
			.collect(),
	)
}

fn filter_node(node: &TreeNode, filter: &TypeFilter) -> Option<TreeNode> {
	let children: Vec<TreeNode> = node
		.children
		.iter()
		.filter_map(|child| filter_node(child, filter))
		.collect();
	if !filter.allows(node.node_type) && children.is_empty() {
		return None;
	}
	let mut kept = node.detached();
	kept.children = children;
	Some(kept)
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::catalog::{fixture, flatten};

	#[test]
	fn empty_filter_borrows_input() {
		let catalog = fixture::catalog();
		let filtered = filter_forest(catalog.forest(), &TypeFilter::all());
		assert!(matches!(filtered, Cow::Borrowed(_)));
		assert_eq!(&*filtered, catalog.forest());
	}

	#[test]
	fn course_filter_keeps_ancestor_chains() {
		let catalog = fixture::catalog();
		let filtered = filter_forest(catalog.forest(), &TypeFilter::only(NodeType::Course));
		let ids: Vec<&str> = flatten(&filtered).iter().map(|n| n.id.as_str()).collect();

		assert_eq!(
			ids,
			vec![
				"college-cci",
				"dept-cs",
				"prog-bs-cs",
				"conc-ai-robotics",
				"course-ai-intro",
				"course-robotics",
				"conc-hci",
				"course-hci",
				"course-ui-design",
				"prog-ms-cs",
				"course-ml-advanced",
				"course-research-methods",
				"dept-sis",
				"prog-bs-se",
				"course-se-principles",
			]
		);
		// Source tree is untouched.
		assert!(catalog.node("faculty-section").is_some());
	}

	#[test]
	fn matching_nodes_drop_unmatched_children() {
		let forest = vec![
			TreeNode::new("p", "P", NodeType::Program)
				.with_child(TreeNode::new("c", "C", NodeType::Course))
				.with_child(TreeNode::new("q", "Q", NodeType::Program)),
		];
		let filtered = filter_forest(&forest, &TypeFilter::only(NodeType::Program));
		let ids: Vec<&str> = flatten(&filtered).iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["p", "q"]);
	}

	#[test]
	fn nothing_matches_yields_empty_forest() {
		let forest = vec![TreeNode::new("d", "D", NodeType::Department)];
		assert!(filter_forest(&forest, &TypeFilter::only(NodeType::Faculty)).is_empty());
	}

	fn arb_type() -> impl Strategy<Value = NodeType> {
		prop::sample::select(NodeType::ALL.to_vec())
	}

	fn arb_forest() -> impl Strategy<Value = Vec<TreeNode>> {
		let leaf = (0u32..100, arb_type()).prop_map(|(n, t)| TreeNode::new(format!("n{n}"), "leaf", t));
		let tree = leaf.prop_recursive(4, 40, 4, |inner| {
			(0u32..100, arb_type(), prop::collection::vec(inner, 0..4)).prop_map(|(n, t, children)| {
				let mut node = TreeNode::new(format!("n{n}"), "branch", t);
				node.children = children;
				node
			})
		});
		prop::collection::vec(tree, 0..4)
	}

	fn justified(node: &TreeNode, filter: &TypeFilter) -> bool {
		filter.allows(node.node_type) || !node.children.is_empty()
	}

	proptest! {
		#[test]
		fn every_kept_node_is_justified(
			forest in arb_forest(),
			types in prop::collection::vec(arb_type(), 1..3),
		) {
			let filter: TypeFilter = types.into_iter().collect();
			let filtered = filter_forest(&forest, &filter);
			for node in flatten(&filtered) {
				prop_assert!(justified(node, &filter));
				for child in &node.children {
					prop_assert!(justified(child, &filter));
				}
			}
			let matching_before = flatten(&forest).iter().filter(|n| filter.allows(n.node_type)).count();
			let matching_after = flatten(&filtered).iter().filter(|n| filter.allows(n.node_type)).count();
			prop_assert_eq!(matching_before, matching_after);
		}
	}
}
