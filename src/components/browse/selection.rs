use std::fmt;

use indexmap::IndexMap;
use log::debug;

use crate::catalog::TreeNode;

/// One of the two independent selection contexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Panel {
	/// Primary view.
	Left,
	/// Secondary view.
	Right,
}

impl Panel {
	/// Both panels, left first.
	pub const BOTH: [Panel; 2] = [Panel::Left, Panel::Right];

	/// The opposite panel.
	pub fn other(self) -> Panel {
		match self {
			Panel::Left => Panel::Right,
			Panel::Right => Panel::Left,
		}
	}

	/// Lower-case name used in selection keys.
	pub fn as_str(self) -> &'static str {
		match self {
			Panel::Left => "left",
			Panel::Right => "right",
		}
	}
}

impl fmt::Display for Panel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Selection map key, displayed as `{panel}-{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SelectionKey {
	/// Owning panel.
	pub panel: Panel,
	/// Raw tree id.
	pub id: String,
}

impl SelectionKey {
	/// Key of `id` in `panel`.
	pub fn new(panel: Panel, id: impl Into<String>) -> Self {
		Self {
			panel,
			id: id.into(),
		}
	}
}

impl fmt::Display for SelectionKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.panel, self.id)
	}
}

/// A selected entity, stored without its subtree.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedNode {
	/// The entity, children stripped.
	pub node: TreeNode,
	/// Panel it was selected in.
	pub panel: Panel,
}

/// Per-panel selection state with descendant propagation.
///
/// An entity id is selected in at most one panel. Selecting a node selects
/// its whole subtree in the same panel; toggling it off clears the subtree.
/// Conflicting requests leave the state untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
	entries: IndexMap<SelectionKey, SelectedNode>,
}

impl Selection {
	/// An empty selection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Toggles `node` and its descendants in `panel`.
	pub fn select(&mut self, node: &TreeNode, panel: Panel) {
		let descendants = node.descendants();
		let key = SelectionKey::new(panel, &node.id);

		if self.entries.contains_key(&key) {
			self.entries.shift_remove(&key);
			for descendant in &descendants {
				self.entries
					.shift_remove(&SelectionKey::new(panel, &descendant.id));
			}
			return;
		}

		let other = panel.other();
		let conflict = std::iter::once(node)
			.chain(descendants.iter().copied())
			.find(|n| self.contains(other, &n.id));
		if let Some(conflict) = conflict {
			debug!(
				"selection of {key} rejected: {} already selected in {other} panel",
				conflict.id
			);
			return;
		}

		for n in std::iter::once(node).chain(descendants) {
			self.entries.insert(
				SelectionKey::new(panel, &n.id),
				SelectedNode {
					node: n.detached(),
					panel,
				},
			);
		}
	}

	/// Drops the single `{panel}-{id}` entry; descendants stay selected.
	pub fn remove(&mut self, id: &str, panel: Panel) {
		self.entries.shift_remove(&SelectionKey::new(panel, id));
	}

	/// Selects into whichever panel holds fewer entries, ties going left.
	/// Does nothing if the entity is already selected anywhere.
	pub fn select_from_search(&mut self, node: &TreeNode) {
		if self.is_selected_anywhere(&node.id) {
			debug!("search pick {} ignored: already selected", node.id);
			return;
		}
		let panel = if self.count(Panel::Left) <= self.count(Panel::Right) {
			Panel::Left
		} else {
			Panel::Right
		};
		self.select(node, panel);
	}

	/// Entries tagged with `panel`, in insertion order.
	pub fn for_panel(&self, panel: Panel) -> Vec<&SelectedNode> {
		self.entries.values().filter(|s| s.panel == panel).collect()
	}

	/// True when `id` is selected in `panel`.
	pub fn contains(&self, panel: Panel, id: &str) -> bool {
		self.entries.contains_key(&SelectionKey::new(panel, id))
	}

	/// True when `id` is selected in either panel.
	pub fn is_selected_anywhere(&self, id: &str) -> bool {
		Panel::BOTH.iter().any(|&p| self.contains(p, id))
	}

	/// True when some strict descendant of `node` is selected in `panel`.
	pub fn has_selected_descendant(&self, node: &TreeNode, panel: Panel) -> bool {
		node.descendants()
			.iter()
			.any(|d| self.contains(panel, &d.id))
	}

	/// Number of entries in `panel`.
	pub fn count(&self, panel: Panel) -> usize {
		self.entries.values().filter(|s| s.panel == panel).count()
	}

	/// Entries across both panels.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when nothing is selected.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&SelectionKey, &SelectedNode)> {
		self.entries.iter()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use proptest::prelude::*;

	use super::*;
	use crate::catalog::{NodeType, fixture};

	fn ids(selection: &Selection, panel: Panel) -> BTreeSet<String> {
		selection
			.for_panel(panel)
			.into_iter()
			.map(|s| s.node.id.clone())
			.collect()
	}

	#[test]
	fn leaf_conflict_is_rejected() {
		let catalog = fixture::catalog();
		let course = catalog.node("course-ai-intro").unwrap();
		let mut selection = Selection::new();

		selection.select(course, Panel::Left);
		let before = selection.clone();
		selection.select(course, Panel::Right);

		assert_eq!(selection, before);
		assert!(selection.for_panel(Panel::Right).is_empty());
		let left: Vec<_> = selection
			.for_panel(Panel::Left)
			.into_iter()
			.map(|s| s.node.id.as_str())
			.collect();
		assert_eq!(left, vec!["course-ai-intro"]);
	}

	#[test]
	fn program_selects_whole_subtree() {
		let catalog = fixture::catalog();
		let program = catalog.node("prog-bs-cs").unwrap();
		let mut selection = Selection::new();

		selection.select(program, Panel::Left);

		let left = selection.for_panel(Panel::Left);
		assert_eq!(left.len(), 1 + program.descendants().len());
		assert_eq!(left.len(), 7);
		assert!(left.iter().all(|s| s.panel == Panel::Left));
		assert_eq!(left[0].node.id, "prog-bs-cs");
		assert!(left[0].node.children.is_empty());
	}

	#[test]
	fn descendant_conflict_blocks_ancestor() {
		let catalog = fixture::catalog();
		let mut selection = Selection::new();
		selection.select(catalog.node("course-hci").unwrap(), Panel::Right);
		let before = selection.clone();

		selection.select(catalog.node("dept-cs").unwrap(), Panel::Left);

		assert_eq!(selection, before);
	}

	#[test]
	fn toggle_off_cascades_but_remove_does_not() {
		let catalog = fixture::catalog();
		let conc = catalog.node("conc-hci").unwrap();
		let mut selection = Selection::new();

		selection.select(conc, Panel::Left);
		selection.remove("conc-hci", Panel::Left);
		assert_eq!(
			ids(&selection, Panel::Left),
			BTreeSet::from(["course-hci".to_string(), "course-ui-design".to_string()])
		);

		selection.select(conc, Panel::Left);
		selection.select(conc, Panel::Left);
		assert!(selection.is_empty());
	}

	#[test]
	fn remove_of_missing_entry_is_a_no_op() {
		let mut selection = Selection::new();
		selection.select(&TreeNode::new("a", "A", NodeType::Course), Panel::Left);
		let before = selection.clone();
		selection.remove("a", Panel::Right);
		selection.remove("b", Panel::Left);
		assert_eq!(selection, before);
	}

	#[test]
	fn search_picks_balance_panels() {
		let catalog = fixture::catalog();
		let mut selection = Selection::new();

		selection.select_from_search(catalog.node("course-hci").unwrap());
		assert!(selection.contains(Panel::Left, "course-hci"));

		selection.select_from_search(catalog.node("course-robotics").unwrap());
		assert!(selection.contains(Panel::Right, "course-robotics"));

		selection.select_from_search(catalog.node("fac-smith").unwrap());
		assert!(selection.contains(Panel::Left, "fac-smith"));

		let before = selection.clone();
		selection.select_from_search(catalog.node("course-robotics").unwrap());
		assert_eq!(selection, before);
	}

	#[test]
	fn keys_render_with_panel_prefix() {
		assert_eq!(SelectionKey::new(Panel::Right, "fac-doe").to_string(), "right-fac-doe");
	}

	fn arb_tree() -> impl Strategy<Value = TreeNode> {
		let leaf = (0u32..1000).prop_map(|n| TreeNode::new(format!("n{n}"), "leaf", NodeType::Course));
		leaf.prop_recursive(4, 32, 4, |inner| {
			(0u32..1000, prop::collection::vec(inner, 0..4)).prop_map(|(n, children)| {
				let mut node = TreeNode::new(format!("n{n}"), "branch", NodeType::Program);
				node.children = children;
				node
			})
		})
		.prop_map(|tree| {
			// Re-number in pre-order so ids are unique.
			fn renumber(node: &mut TreeNode, next: &mut usize) {
				node.id = format!("node-{next}");
				*next += 1;
				for child in &mut node.children {
					renumber(child, next);
				}
			}
			let mut tree = tree;
			renumber(&mut tree, &mut 0);
			tree
		})
	}

	fn arb_panel() -> impl Strategy<Value = Panel> {
		prop_oneof![Just(Panel::Left), Just(Panel::Right)]
	}

	proptest! {
		#[test]
		fn select_covers_root_and_descendants(tree in arb_tree(), panel in arb_panel()) {
			let mut selection = Selection::new();
			selection.select(&tree, panel);

			let expected: BTreeSet<String> = std::iter::once(&tree)
				.chain(tree.descendants())
				.map(|n| n.id.clone())
				.collect();
			prop_assert_eq!(ids(&selection, panel), expected);
			prop_assert!(selection.for_panel(panel.other()).is_empty());
		}

		#[test]
		fn other_panel_is_exclusive(tree in arb_tree(), panel in arb_panel(), pick in any::<prop::sample::Index>()) {
			let nodes: Vec<&TreeNode> = std::iter::once(&tree).chain(tree.descendants()).collect();
			let node = nodes[pick.index(nodes.len())];

			let mut selection = Selection::new();
			selection.select(node, panel);
			let before = selection.clone();
			selection.select(node, panel.other());
			prop_assert_eq!(&selection, &before);

			// Any ancestor of the selected node is blocked as well.
			selection.select(&tree, panel.other());
			prop_assert_eq!(&selection, &before);
		}

		#[test]
		fn select_twice_is_identity(tree in arb_tree(), panel in arb_panel()) {
			let mut selection = Selection::new();
			selection.select(&TreeNode::new("unrelated", "Unrelated", NodeType::Faculty), panel.other());
			let before = selection.clone();

			selection.select(&tree, panel);
			selection.select(&tree, panel);
			prop_assert_eq!(selection, before);
		}
	}
}
