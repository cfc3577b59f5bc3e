use std::collections::HashMap;

use log::trace;

use crate::catalog::{CanonicalId, Catalog, Relationship, RelationshipType};
use crate::config::ViewConfig;

use super::types::PositionedNode;

/// Stroke appearance of a relationship type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	/// Stroke color.
	pub color: &'static str,
	/// Width at strength 1.
	pub base_width: f64,
	/// SVG `stroke-dasharray`, if dashed.
	pub dash: Option<&'static str>,
}

/// Fixed style table, one entry per relationship type.
pub fn edge_style(kind: RelationshipType) -> EdgeStyle {
	match kind {
		RelationshipType::Teaches => EdgeStyle {
			color: "#4B5563",
			base_width: 2.0,
			dash: None,
		},
		RelationshipType::Prerequisite => EdgeStyle {
			color: "#DC2626",
			base_width: 2.0,
			dash: Some("5,5"),
		},
		RelationshipType::Collaborates => EdgeStyle {
			color: "#2563EB",
			base_width: 2.0,
			dash: Some("2,2"),
		},
		RelationshipType::Researches => EdgeStyle {
			color: "#7C3AED",
			base_width: 2.0,
			dash: None,
		},
		_ => EdgeStyle {
			color: "#9CA3AF",
			base_width: 1.0,
			dash: None,
		},
	}
}

/// Geometry and stroke descriptor for one relationship.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedEdge {
	/// `{source}-{target}-{type}` over the endpoints' DOM keys.
	pub id: String,
	/// The relationship drawn.
	pub relationship: Relationship,
	/// Normalized source.
	pub source: CanonicalId,
	/// Normalized target.
	pub target: CanonicalId,
	/// SVG arc path data.
	pub path: String,
	/// Stroke color.
	pub color: &'static str,
	/// Dash pattern, if any.
	pub dash: Option<&'static str>,
	/// Base width scaled by strength.
	pub stroke_width: f64,
	/// Width of the invisible hover/click path behind the visible one.
	pub hit_width: f64,
	/// Drawn with an arrowhead.
	pub directed: bool,
}

impl RoutedEdge {
	/// Arrowhead marker id, for directed edges.
	pub fn marker_id(&self) -> Option<String> {
		self.directed.then(|| format!("arrow-{}", self.id))
	}

	/// True when either endpoint is `key`.
	pub fn touches(&self, key: &CanonicalId) -> bool {
		&self.source == key || &self.target == key
	}
}

/// Where the ray from a rectangle's center at `angle` leaves the rectangle.
fn exit_point(cx: f64, cy: f64, width: f64, height: f64, angle: f64) -> (f64, f64) {
	let (sin, cos) = angle.sin_cos();
	if cos.abs() * height > sin.abs() * width {
		let half = cos.signum() * width / 2.0;
		(cx + half, cy + angle.tan() * half)
	} else {
		let half = sin.signum() * height / 2.0;
		(cx + cos / sin * half, cy + half)
	}
}

fn fmt_coord(v: f64) -> String {
	// Avoids "-0.00" for values that round to zero.
	let v = if v.abs() < 0.005 { 0.0 } else { v };
	format!("{v:.2}")
}

/// Arc between the facing edges of two node rectangles.
///
/// The arc radius equals the chord between the clipped endpoints, so every
/// edge bulges to the left of its direction of travel. Returns `None` for
/// coincident centers.
pub fn arc_path(source: &PositionedNode, target: &PositionedNode) -> Option<String> {
	let (dx, dy) = (target.x - source.x, target.y - source.y);
	if dx.hypot(dy) < f64::EPSILON {
		return None;
	}
	let angle = dy.atan2(dx);
	let (sx, sy) = exit_point(source.x, source.y, source.width(), source.height(), angle);
	let (tx, ty) = exit_point(
		target.x,
		target.y,
		target.width(),
		target.height(),
		angle + std::f64::consts::PI,
	);
	let r = (tx - sx).hypot(ty - sy);
	Some(format!(
		"M {} {} A {r} {r} 0 0 1 {} {}",
		fmt_coord(sx),
		fmt_coord(sy),
		fmt_coord(tx),
		fmt_coord(ty),
		r = fmt_coord(r),
	))
}

/// Positioned nodes indexed by canonical id. The first node wins on
/// duplicate keys.
pub struct NodeLookup<'a> {
	nodes: HashMap<&'a CanonicalId, &'a PositionedNode>,
}

impl<'a> NodeLookup<'a> {
	/// Indexes `nodes` by key.
	pub fn new(nodes: &'a [PositionedNode]) -> Self {
		let mut map = HashMap::with_capacity(nodes.len());
		for node in nodes {
			map.entry(&node.key).or_insert(node);
		}
		Self { nodes: map }
	}

	/// Node placed under `key`.
	pub fn get(&self, key: &CanonicalId) -> Option<&'a PositionedNode> {
		self.nodes.get(key).copied()
	}
}

/// Routes one relationship, or skips it when an endpoint is not on screen.
pub fn route(
	catalog: &Catalog,
	relationship: &Relationship,
	nodes: &NodeLookup<'_>,
	config: &ViewConfig,
) -> Option<RoutedEdge> {
	let source_key = catalog.normalize(&relationship.source);
	let target_key = catalog.normalize(&relationship.target);
	let (Some(source), Some(target)) = (nodes.get(&source_key), nodes.get(&target_key)) else {
		trace!("skipping {}: endpoint not positioned", relationship.key());
		return None;
	};
	let path = arc_path(source, target)?;

	let style = edge_style(relationship.kind);
	let stroke_width = style.base_width * relationship.strength();
	Some(RoutedEdge {
		id: format!("{}-{}-{}", source_key.dom_key(), target_key.dom_key(), relationship.kind),
		relationship: relationship.clone(),
		source: source_key,
		target: target_key,
		path,
		color: style.color,
		dash: style.dash,
		stroke_width,
		hit_width: stroke_width + config.hit_padding,
		directed: relationship.kind.is_directed(),
	})
}

/// Routes every relationship whose endpoints are both positioned.
pub fn route_all<'r>(
	catalog: &Catalog,
	relationships: impl IntoIterator<Item = &'r Relationship>,
	nodes: &[PositionedNode],
	config: &ViewConfig,
) -> Vec<RoutedEdge> {
	let lookup = NodeLookup::new(nodes);
	relationships
		.into_iter()
		.filter_map(|rel| route(catalog, rel, &lookup, config))
		.collect()
}
