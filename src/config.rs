//! Tunables for layout, camera behaviour and search.
//!
//! Every component takes these as optional props.

/// Radial layout parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// `baseRadius = ring_factor × min(width, height)`.
	pub ring_factor: f64,
	/// Inner ring distance, as a multiple of the base radius.
	pub inner_ring: f64,
	/// Outer ring distance, as a multiple of the base radius.
	pub outer_ring: f64,
	/// Display radius of selected nodes.
	pub primary_radius: f64,
	/// Display radius of related nodes.
	pub related_radius: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			ring_factor: 0.35,
			inner_ring: 0.6,
			outer_ring: 1.0,
			primary_radius: 40.0,
			related_radius: 35.0,
		}
	}
}

/// Pan, zoom and edge hit-testing parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
	/// Lower zoom bound.
	pub min_scale: f64,
	/// Upper zoom bound.
	pub max_scale: f64,
	/// Multiplicative zoom per wheel notch.
	pub zoom_step: f64,
	/// Scale reached when a node is clicked.
	pub focus_scale: f64,
	/// Duration of the click-to-center transition.
	pub focus_duration_ms: f64,
	/// Extra width of the invisible hit path around each edge.
	pub hit_padding: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.5,
			max_scale: 2.0,
			zoom_step: 1.1,
			focus_scale: 1.2,
			focus_duration_ms: 750.0,
			hit_padding: 10.0,
		}
	}
}

/// Search bar parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
	/// Maximum number of results.
	pub limit: usize,
	/// Queries shorter than this return nothing.
	pub min_query_len: usize,
	/// Minimum similarity in `0..=1`.
	pub threshold: f64,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			limit: 10,
			min_query_len: 2,
			threshold: 0.85,
		}
	}
}

/// All explorer tunables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExplorerConfig {
	/// Radial layout.
	pub layout: LayoutConfig,
	/// Camera and edges.
	pub view: ViewConfig,
	/// Search bar.
	pub search: SearchConfig,
}
