use std::f64::consts::PI;

use crate::config::LayoutConfig;

use super::types::{GraphNode, PositionedNode};

/// Places selected nodes on the inner ring and related nodes on the outer
/// ring, both centered on the origin.
///
/// Deterministic for a given input order. Returns nothing for an empty node
/// list or a viewport without area.
pub fn radial_layout(
	nodes: &[GraphNode],
	width: f64,
	height: f64,
	config: &LayoutConfig,
) -> Vec<PositionedNode> {
	if nodes.is_empty() || !(width > 0.0 && height > 0.0) {
		return Vec::new();
	}
	let base = width.min(height) * config.ring_factor;

	let (related, primary): (Vec<&GraphNode>, Vec<&GraphNode>) = nodes.iter().partition(|n| n.related);
	let inner = place_ring(&primary, base * config.inner_ring, config.primary_radius);
	let outer = place_ring(&related, base * config.outer_ring, config.related_radius);
	inner.chain(outer).collect()
}

fn place_ring<'a>(
	ring: &'a [&'a GraphNode],
	distance: f64,
	radius: f64,
) -> impl Iterator<Item = PositionedNode> + 'a {
	let step = 2.0 * PI / ring.len().max(1) as f64;
	ring.iter().enumerate().map(move |(i, node)| {
		let angle = i as f64 * step;
		PositionedNode {
			key: node.key.clone(),
			node: node.node.clone(),
			related: node.related,
			x: angle.cos() * distance,
			y: angle.sin() * distance,
			radius,
		}
	})
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::catalog::{CanonicalId, NodeType, TreeNode};

	const EPS: f64 = 1e-9;

	fn graph_node(id: &str, related: bool) -> GraphNode {
		GraphNode {
			key: CanonicalId::Resolved(id.to_string()),
			node: TreeNode::new(id, id, NodeType::Course),
			related,
		}
	}

	#[test]
	fn two_primaries_sit_opposite_on_the_inner_ring() {
		let nodes = [graph_node("a", false), graph_node("b", false)];
		let placed = radial_layout(&nodes, 800.0, 600.0, &LayoutConfig::default());

		assert_eq!(placed.len(), 2);
		assert!((placed[0].x - 126.0).abs() < EPS);
		assert!(placed[0].y.abs() < EPS);
		assert!((placed[1].x + 126.0).abs() < EPS);
		assert!(placed[1].y.abs() < EPS);
		assert!(placed.iter().all(|p| p.radius == 40.0 && !p.related));
	}

	#[test]
	fn related_nodes_go_outside_with_smaller_radius() {
		let nodes = [
			graph_node("r1", true),
			graph_node("a", false),
			graph_node("r2", true),
		];
		let placed = radial_layout(&nodes, 800.0, 600.0, &LayoutConfig::default());

		let ids: Vec<&str> = placed.iter().map(|p| p.key.as_str()).collect();
		assert_eq!(ids, vec!["a", "r1", "r2"]);
		assert!((placed[0].x - 126.0).abs() < EPS);
		assert!((placed[1].x - 210.0).abs() < EPS);
		assert!((placed[2].x + 210.0).abs() < EPS);
		assert_eq!(placed[1].radius, 35.0);
	}

	#[test]
	fn degenerate_inputs_yield_nothing() {
		let config = LayoutConfig::default();
		assert!(radial_layout(&[], 800.0, 600.0, &config).is_empty());
		let nodes = [graph_node("a", false)];
		assert!(radial_layout(&nodes, 0.0, 600.0, &config).is_empty());
		assert!(radial_layout(&nodes, 800.0, -1.0, &config).is_empty());
		assert!(radial_layout(&nodes, f64::NAN, 600.0, &config).is_empty());
	}

	fn arb_nodes() -> impl Strategy<Value = Vec<GraphNode>> {
		prop::collection::vec(any::<bool>(), 1..30).prop_map(|flags| {
			flags
				.into_iter()
				.enumerate()
				.map(|(i, related)| graph_node(&format!("n{i}"), related))
				.collect()
		})
	}

	proptest! {
		#[test]
		fn layout_is_deterministic(nodes in arb_nodes(), w in 1.0f64..4000.0, h in 1.0f64..4000.0) {
			let config = LayoutConfig::default();
			let first = radial_layout(&nodes, w, h, &config);
			let second = radial_layout(&nodes, w, h, &config);
			prop_assert_eq!(first.len(), second.len());
			for (a, b) in first.iter().zip(&second) {
				prop_assert_eq!(a.x.to_bits(), b.x.to_bits());
				prop_assert_eq!(a.y.to_bits(), b.y.to_bits());
				prop_assert_eq!(a.radius.to_bits(), b.radius.to_bits());
			}
		}

		#[test]
		fn rings_are_separated(nodes in arb_nodes(), w in 1.0f64..4000.0, h in 1.0f64..4000.0) {
			let placed = radial_layout(&nodes, w, h, &LayoutConfig::default());
			prop_assert_eq!(placed.len(), nodes.len());
			let base = 0.35 * w.min(h);
			for p in &placed {
				let expected = if p.related { base } else { 0.6 * base };
				let distance = p.x.hypot(p.y);
				prop_assert!((distance - expected).abs() <= 1e-9 * base.max(1.0));
			}
		}
	}
}
