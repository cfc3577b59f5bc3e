use crate::catalog::{CanonicalId, TreeNode};

/// Layout input: an entity to draw, keyed by its canonical id.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Normalized id.
	pub key: CanonicalId,
	/// Display data.
	pub node: TreeNode,
	/// Reached through a relationship rather than selected.
	pub related: bool,
}

/// A graph node placed for the current layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	/// Normalized id.
	pub key: CanonicalId,
	/// Display data.
	pub node: TreeNode,
	/// Reached through a relationship rather than selected.
	pub related: bool,
	/// Centre in layout space, origin at the middle.
	pub x: f64,
	/// See `x`.
	pub y: f64,
	/// Display radius.
	pub radius: f64,
}

impl PositionedNode {
	/// Width of the node's rectangle.
	pub fn width(&self) -> f64 {
		self.radius * 2.0
	}

	/// Height of the node's rectangle.
	pub fn height(&self) -> f64 {
		self.radius * 1.5
	}
}
