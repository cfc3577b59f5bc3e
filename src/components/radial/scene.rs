use std::collections::{BTreeSet, HashSet};

use log::debug;

use crate::catalog::{CanonicalId, Catalog, Relationship, RelationshipType};
use crate::components::browse::Selection;

use super::types::GraphNode;

/// Nodes to lay out: the selection in selection order, then, with
/// `show_related`, every entity one relationship hop away.
pub fn scene_nodes(selection: &Selection, catalog: &Catalog, show_related: bool) -> Vec<GraphNode> {
	let mut seen = HashSet::new();
	let mut nodes: Vec<GraphNode> = selection
		.iter()
		.filter_map(|(_, selected)| {
			let key = catalog.normalize(&selected.node.id);
			seen.insert(key.clone()).then(|| GraphNode {
				key,
				node: selected.node.clone(),
				related: false,
			})
		})
		.collect();
	if !show_related {
		return nodes;
	}

	let selected: HashSet<CanonicalId> = seen.clone();
	for rel in catalog.relationships() {
		let source = catalog.normalize(&rel.source);
		let target = catalog.normalize(&rel.target);
		let hops = [(&source, &target, &rel.target), (&target, &source, &rel.source)];
		for (from, to, raw) in hops {
			if !selected.contains(from) || !seen.insert(to.clone()) {
				continue;
			}
			if !to.is_resolved() {
				debug!("related endpoint {raw} is not in the catalog, guessed {to}");
			}
			nodes.push(GraphNode {
				key: to.clone(),
				node: catalog.describe(to, raw),
				related: true,
			});
		}
	}
	nodes
}

/// Relationships of an active type whose endpoints are both in `nodes`.
pub fn relevant_relationships<'c>(
	catalog: &'c Catalog,
	nodes: &[GraphNode],
	active: &BTreeSet<RelationshipType>,
) -> Vec<&'c Relationship> {
	let keys: HashSet<&CanonicalId> = nodes.iter().map(|n| &n.key).collect();
	catalog
		.relationships()
		.iter()
		.filter(|rel| active.contains(&rel.kind))
		.filter(|rel| {
			keys.contains(&catalog.normalize(&rel.source)) && keys.contains(&catalog.normalize(&rel.target))
		})
		.collect()
}
