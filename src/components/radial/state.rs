use std::collections::BTreeSet;

use crate::catalog::{CanonicalId, Relationship, RelationshipType};
use crate::config::ViewConfig;

use super::routing::RoutedEdge;

/// Screen-space translation and scale applied to the graph layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	/// Horizontal offset in pixels.
	pub x: f64,
	/// Vertical offset in pixels.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl ViewTransform {
	fn lerp(self, to: ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}

	/// SVG `transform` attribute value.
	pub fn to_svg(self) -> String {
		format!("translate({},{}) scale({})", self.x, self.y, self.k)
	}
}

/// Background drag in progress.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanState {
	/// A drag is under way.
	pub active: bool,
	/// Pointer position where the drag started.
	pub start_x: f64,
	/// See `start_x`.
	pub start_y: f64,
	/// Transform offset when the drag started.
	pub transform_start_x: f64,
	/// See `transform_start_x`.
	pub transform_start_y: f64,
}

/// What the pointer is over.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
	/// Hovered node.
	pub node: Option<CanonicalId>,
	/// Hovered edge id.
	pub relationship: Option<String>,
	/// Pointer position of the last edge hover, for tooltip placement.
	pub pointer: (f64, f64),
}

/// Eased move between two transforms, driven by frame timestamps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransition {
	/// Transform at the start.
	pub from: ViewTransform,
	/// Target transform.
	pub to: ViewTransform,
	/// `performance.now()` at the start.
	pub started_at: f64,
	/// Length in milliseconds.
	pub duration_ms: f64,
}

impl CameraTransition {
	fn progress(&self, now: f64) -> f64 {
		if self.duration_ms <= 0.0 {
			return 1.0;
		}
		((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
	}
}

fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// Camera, hover, legend and detail-panel state of the radial view.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialViewState {
	/// Current camera.
	pub transform: ViewTransform,
	/// Drag state.
	pub pan: PanState,
	/// Hover state.
	pub hover: HoverState,
	/// Relationship shown in the detail panel.
	pub selected_relationship: Option<Relationship>,
	/// One-hop expansion is on.
	pub show_related: bool,
	/// Viewport size in pixels.
	pub width: f64,
	/// See `width`.
	pub height: f64,
	active_types: BTreeSet<RelationshipType>,
	transition: Option<CameraTransition>,
	config: ViewConfig,
}

impl RadialViewState {
	/// Starts with the layout origin at the viewport midpoint and every
	/// relationship type visible.
	pub fn new(width: f64, height: f64, config: ViewConfig) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hover: HoverState::default(),
			selected_relationship: None,
			show_related: false,
			width,
			height,
			active_types: RelationshipType::ALL.into_iter().collect(),
			transition: None,
			config,
		}
	}

	/// Keeps the origin where it was relative to the viewport midpoint.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}

	/// Starts a background drag at a container-relative point.
	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.transition = None;
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Moves the camera with the pointer. Returns false when no pan is active.
	pub fn pan_to(&mut self, x: f64, y: f64) -> bool {
		if !self.pan.active {
			return false;
		}
		self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		true
	}

	/// Ends the drag.
	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Zooms one wheel notch about the screen point `(x, y)`.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		self.transition = None;
		let factor = if delta_y > 0.0 {
			1.0 / self.config.zoom_step
		} else {
			self.config.zoom_step
		};
		let new_k = (self.transform.k * factor).clamp(self.config.min_scale, self.config.max_scale);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Starts an eased move that centers the graph point `(x, y)`.
	pub fn focus_on(&mut self, x: f64, y: f64, now: f64) {
		let k = self
			.config
			.focus_scale
			.clamp(self.config.min_scale, self.config.max_scale);
		self.transition = Some(CameraTransition {
			from: self.transform,
			to: ViewTransform {
				x: self.width / 2.0 - x * k,
				y: self.height / 2.0 - y * k,
				k,
			},
			started_at: now,
			duration_ms: self.config.focus_duration_ms,
		});
	}

	/// Advances the camera transition. Returns true while it is still running.
	pub fn tick(&mut self, now: f64) -> bool {
		let Some(transition) = self.transition else {
			return false;
		};
		let t = transition.progress(now);
		self.transform = transition.from.lerp(transition.to, ease_in_out_cubic(t));
		if t >= 1.0 {
			self.transform = transition.to;
			self.transition = None;
		}
		self.transition.is_some()
	}

	/// True while a focus transition is running.
	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	/// Node hover clears and blocks edge hover.
	pub fn hover_node(&mut self, node: Option<CanonicalId>) {
		if node.is_some() {
			self.hover.relationship = None;
		}
		self.hover.node = node;
	}

	/// Edge hover is ignored while a node is hovered.
	pub fn hover_relationship(&mut self, id: Option<String>, pointer: (f64, f64)) {
		if id.is_some() && self.hover.node.is_some() {
			return;
		}
		self.hover.relationship = id;
		self.hover.pointer = pointer;
	}

	/// A hovered node highlights its incident edges and outranks edge hover.
	pub fn is_edge_highlighted(&self, edge: &RoutedEdge) -> bool {
		match &self.hover.node {
			Some(node) => edge.touches(node),
			None => self.hover.relationship.as_deref() == Some(edge.id.as_str()),
		}
	}

	/// Related nodes fade unless hovered.
	pub fn node_opacity(&self, key: &CanonicalId, related: bool) -> f64 {
		match &self.hover.node {
			Some(hovered) if hovered == key => 1.0,
			Some(_) if related => 0.3,
			Some(_) => 0.5,
			None if related => 0.7,
			None => 1.0,
		}
	}

	/// Opens the detail panel, or closes it when the same endpoints are
	/// clicked again.
	pub fn click_relationship(&mut self, relationship: &Relationship) {
		let same = self
			.selected_relationship
			.as_ref()
			.is_some_and(|current| current.same_endpoints(relationship));
		self.selected_relationship = if same {
			None
		} else {
			Some(relationship.clone())
		};
	}

	/// Shows or hides one relationship type.
	pub fn toggle_type(&mut self, kind: RelationshipType) {
		if !self.active_types.remove(&kind) {
			self.active_types.insert(kind);
		}
	}

	/// True when edges of `kind` are drawn.
	pub fn is_type_active(&self, kind: RelationshipType) -> bool {
		self.active_types.contains(&kind)
	}

	/// Types currently drawn.
	pub fn active_types(&self) -> &BTreeSet<RelationshipType> {
		&self.active_types
	}

	/// Flips one-hop expansion.
	pub fn toggle_related(&mut self) {
		self.show_related = !self.show_related;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn state() -> RadialViewState {
		RadialViewState::new(800.0, 600.0, ViewConfig::default())
	}

	fn edge(source: &str, target: &str) -> RoutedEdge {
		RoutedEdge {
			id: format!("{source}-{target}-teaches"),
			relationship: Relationship::new(source, target, RelationshipType::Teaches),
			source: CanonicalId::Resolved(source.into()),
			target: CanonicalId::Resolved(target.into()),
			path: String::new(),
			color: "#4B5563",
			dash: None,
			stroke_width: 2.0,
			hit_width: 12.0,
			directed: false,
		}
	}

	#[test]
	fn starts_centered_with_every_type_active() {
		let s = state();
		assert_eq!(s.transform, ViewTransform { x: 400.0, y: 300.0, k: 1.0 });
		assert!(RelationshipType::ALL.iter().all(|&t| s.is_type_active(t)));
		assert!(!s.show_related);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut s = state();
		for _ in 0..50 {
			s.zoom_at(400.0, 300.0, -1.0);
		}
		assert!((s.transform.k - 2.0).abs() < EPS);
		for _ in 0..50 {
			s.zoom_at(400.0, 300.0, 1.0);
		}
		assert!((s.transform.k - 0.5).abs() < EPS);
	}

	#[test]
	fn zoom_keeps_the_pointer_fixed() {
		let mut s = state();
		let (px, py) = (100.0, 50.0);
		let before = ((px - s.transform.x) / s.transform.k, (py - s.transform.y) / s.transform.k);
		s.zoom_at(px, py, -1.0);
		let after = ((px - s.transform.x) / s.transform.k, (py - s.transform.y) / s.transform.k);
		assert!((before.0 - after.0).abs() < EPS);
		assert!((before.1 - after.1).abs() < EPS);
	}

	#[test]
	fn pan_follows_the_pointer() {
		let mut s = state();
		assert!(!s.pan_to(10.0, 10.0));
		s.begin_pan(10.0, 20.0);
		assert!(s.pan_to(40.0, 0.0));
		assert_eq!((s.transform.x, s.transform.y), (430.0, 280.0));
		s.end_pan();
		assert!(!s.pan_to(0.0, 0.0));
	}

	#[test]
	fn focus_transition_finishes_centered() {
		let mut s = state();
		s.focus_on(126.0, 0.0, 1000.0);
		assert!(s.is_animating());

		assert!(s.tick(1375.0));
		// Halfway through the easing curve.
		let midway = 400.0 + (400.0 - 126.0 * 1.2 - 400.0) * 0.5;
		assert!((s.transform.x - midway).abs() < EPS);

		assert!(!s.tick(1750.0));
		assert!(!s.is_animating());
		assert!((s.transform.x - (400.0 - 126.0 * 1.2)).abs() < EPS);
		assert!((s.transform.y - 300.0).abs() < EPS);
		assert!((s.transform.k - 1.2).abs() < EPS);
	}

	#[test]
	fn pan_and_zoom_supersede_a_transition() {
		let mut s = state();
		s.focus_on(50.0, 50.0, 0.0);
		s.tick(100.0);
		s.begin_pan(0.0, 0.0);
		assert!(!s.is_animating());
		assert!(!s.tick(200.0));

		s.focus_on(50.0, 50.0, 0.0);
		s.zoom_at(0.0, 0.0, 1.0);
		assert!(!s.is_animating());
	}

	#[test]
	fn easing_is_symmetric() {
		assert_eq!(ease_in_out_cubic(0.0), 0.0);
		assert_eq!(ease_in_out_cubic(1.0), 1.0);
		assert!((ease_in_out_cubic(0.5) - 0.5).abs() < EPS);
		assert!((ease_in_out_cubic(0.25) + ease_in_out_cubic(0.75) - 1.0).abs() < EPS);
	}

	#[test]
	fn resize_keeps_origin_centered() {
		let mut s = state();
		s.resize(1000.0, 400.0);
		assert_eq!((s.transform.x, s.transform.y), (500.0, 200.0));
	}

	#[test]
	fn node_hover_outranks_edge_hover() {
		let mut s = state();
		let touching = edge("fac-smith", "course-ai-intro");
		let elsewhere = edge("fac-doe", "course-hci");

		s.hover_relationship(Some(elsewhere.id.clone()), (5.0, 6.0));
		assert!(s.is_edge_highlighted(&elsewhere));
		assert_eq!(s.hover.pointer, (5.0, 6.0));

		s.hover_node(Some(CanonicalId::Resolved("fac-smith".into())));
		assert!(s.is_edge_highlighted(&touching));
		assert!(!s.is_edge_highlighted(&elsewhere));

		s.hover_relationship(Some(elsewhere.id.clone()), (0.0, 0.0));
		assert_eq!(s.hover.relationship, None);

		s.hover_node(None);
		assert!(!s.is_edge_highlighted(&touching));
	}

	#[test]
	fn opacity_dims_everything_but_the_hovered_node() {
		let mut s = state();
		let a = CanonicalId::Resolved("a".into());
		let b = CanonicalId::Resolved("b".into());
		assert_eq!(s.node_opacity(&a, false), 1.0);
		assert_eq!(s.node_opacity(&b, true), 0.7);

		s.hover_node(Some(a.clone()));
		assert_eq!(s.node_opacity(&a, false), 1.0);
		assert_eq!(s.node_opacity(&b, false), 0.5);
		assert_eq!(s.node_opacity(&b, true), 0.3);
	}

	#[test]
	fn clicking_a_relationship_twice_closes_the_panel() {
		let mut s = state();
		let rel = Relationship::new("fac-smith", "course-ai-intro", RelationshipType::Teaches);
		s.click_relationship(&rel);
		assert_eq!(s.selected_relationship.as_ref(), Some(&rel));

		let other = Relationship::new("course-hci", "course-ui-design", RelationshipType::Prerequisite);
		s.click_relationship(&other);
		assert_eq!(s.selected_relationship.as_ref(), Some(&other));

		// Matched by endpoints, not by type.
		let same_ends = Relationship::new("course-hci", "course-ui-design", RelationshipType::RelatedContent);
		s.click_relationship(&same_ends);
		assert_eq!(s.selected_relationship, None);
	}

	#[test]
	fn legend_and_expansion_toggle() {
		let mut s = state();
		s.toggle_type(RelationshipType::Mentors);
		assert!(!s.is_type_active(RelationshipType::Mentors));
		assert_eq!(s.active_types().len(), RelationshipType::ALL.len() - 1);
		s.toggle_type(RelationshipType::Mentors);
		assert!(s.is_type_active(RelationshipType::Mentors));

		s.toggle_related();
		assert!(s.show_related);
		s.toggle_related();
		assert!(!s.show_related);
	}
}
