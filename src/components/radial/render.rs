use leptos::prelude::*;

use crate::catalog::{NodeType, Relationship, RelationshipType};

use super::routing::edge_style;

/// Rectangle fill per node type; related nodes get the lighter shade.
pub fn node_fill(node_type: NodeType, related: bool) -> &'static str {
	match (node_type, related) {
		(NodeType::College, false) => "#93c5fd",
		(NodeType::Department, false) => "#86efac",
		(NodeType::Program, false) => "#c4b5fd",
		(NodeType::Course, false) => "#fdba74",
		(NodeType::Faculty, false) => "#e5e7eb",
		(NodeType::College, true) => "#bfdbfe",
		(NodeType::Department, true) => "#bbf7d0",
		(NodeType::Program, true) => "#ddd6fe",
		(NodeType::Course, true) => "#fed7aa",
		(NodeType::Faculty, true) => "#f3f4f6",
	}
}

/// Border color and width of a node rectangle.
pub fn node_stroke(related: bool) -> (&'static str, f64) {
	if related { ("#9ca3af", 1.0) } else { ("#374151", 2.0) }
}

/// Highlighted edges are drawn opaque.
pub fn edge_opacity(highlighted: bool) -> f64 {
	if highlighted { 1.0 } else { 0.6 }
}

fn strength_percent(strength: f64) -> String {
	format!("{:.0}%", strength * 100.0)
}

/// Absolute position of the tooltip, just below and right of the pointer.
fn tooltip_style(pointer: (f64, f64)) -> String {
	format!("left: {}px; top: {}px;", pointer.0 + 10.0, pointer.1 + 10.0)
}

/// Year and strength chips shared by the tooltip and the detail panel.
#[component]
fn RelationshipChips(relationship: Relationship) -> impl IntoView {
	let metadata = relationship.metadata.unwrap_or_default();
	view! {
		<div class="chips">
			{metadata.year.map(|year| view! { <span class="chip">{format!("Year: {year}")}</span> })}
			{metadata
				.strength
				.map(|s| view! { <span class="chip">{format!("Strength: {}", strength_percent(s))}</span> })}
		</div>
	}
}

/// Clickable legend that toggles relationship types.
#[component]
pub fn Legend(
	#[prop(into)] active: Signal<Vec<RelationshipType>>,
	on_toggle: Callback<RelationshipType>,
) -> impl IntoView {
	view! {
		<div class="radial-legend">
			<h3>"Relationship Types"</h3>
			{RelationshipType::ALL
				.into_iter()
				.map(|kind| {
					let style = edge_style(kind);
					let class = move || {
						if active.with(|active| active.contains(&kind)) {
							"legend-entry active"
						} else {
							"legend-entry"
						}
					};
					view! {
						<button class=class on:click=move |_| on_toggle.run(kind)>
							<svg width="20" height="2">
								<line
									x1="0"
									y1="1"
									x2="20"
									y2="1"
									stroke=style.color
									stroke-width=style.base_width.to_string()
									stroke-dasharray=style.dash
								/>
							</svg>
							<span>{kind.label()}</span>
						</button>
					}
				})
				.collect_view()}
		</div>
	}
}

/// Floating summary of the hovered relationship.
#[component]
pub fn RelationshipTooltip(relationship: Relationship, pointer: (f64, f64)) -> impl IntoView {
	let label = relationship.kind.label();
	let description = relationship
		.metadata
		.as_ref()
		.and_then(|m| m.description.clone());
	view! {
		<div class="relationship-tooltip" style=tooltip_style(pointer)>
			<div class="title">{label}</div>
			{description.map(|d| view! { <p>{d}</p> })}
			<RelationshipChips relationship=relationship />
		</div>
	}
}

/// Detail panel of the clicked relationship.
#[component]
pub fn RelationshipDetails(relationship: Relationship) -> impl IntoView {
	let endpoints = format!(
		"{} {} {}",
		relationship.source,
		relationship.kind.label(),
		relationship.target
	);
	let description = relationship
		.metadata
		.as_ref()
		.and_then(|m| m.description.clone())
		.unwrap_or_default();
	view! {
		<div class="relationship-details">
			<h3>"Relationship Details"</h3>
			<p class="endpoints">{endpoints}</p>
			<p>{description}</p>
			<RelationshipChips relationship=relationship />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn related_nodes_use_lighter_fills() {
		for node_type in NodeType::ALL {
			assert_ne!(node_fill(node_type, false), node_fill(node_type, true));
		}
		assert_eq!(node_fill(NodeType::Course, false), "#fdba74");
		assert_eq!(node_fill(NodeType::Course, true), "#fed7aa");
		assert_eq!(node_stroke(true), ("#9ca3af", 1.0));
	}

	#[test]
	fn chips_and_tooltip_formatting() {
		assert_eq!(strength_percent(0.9), "90%");
		assert_eq!(strength_percent(0.95), "95%");
		assert_eq!(tooltip_style((100.0, 20.5)), "left: 110px; top: 30.5px;");
		assert_eq!(edge_opacity(false), 0.6);
	}
}
