use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::ev;
use leptos::leptos_dom::helpers::window_event_listener;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlDivElement, MouseEvent, WheelEvent};

use crate::catalog::Catalog;
use crate::components::browse::Selection;
use crate::config::ExplorerConfig;

use super::layout::radial_layout;
use super::render::{Legend, RelationshipDetails, RelationshipTooltip, edge_opacity, node_fill, node_stroke};
use super::routing::route_all;
use super::scene::{relevant_relationships, scene_nodes};
use super::state::RadialViewState;

fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}

fn container_size(container: &HtmlDivElement) -> (f64, f64) {
	let (w, h) = (container.client_width() as f64, container.client_height() as f64);
	(
		if w > 0.0 { w } else { 800.0 },
		if h > 0.0 { h } else { 600.0 },
	)
}

/// Pointer position relative to the container's top-left corner.
fn local_point(container: NodeRef<leptos::html::Div>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = container.get_untracked()?.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Radial graph of the current selection and its relationships.
#[component]
pub fn RadialView(
	catalog: Arc<Catalog>,
	#[prop(into)] selection: Signal<Selection>,
	#[prop(default = ExplorerConfig::default())] config: ExplorerConfig,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let state = RwSignal::new(RadialViewState::new(800.0, 600.0, config.view.clone()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let show_related = Memo::new(move |_| state.with(|s| s.show_related));
	let size = Memo::new(move |_| state.with(|s| (s.width, s.height)));
	let active_types = Memo::new(move |_| state.with(|s| s.active_types().clone()));

	let scene = {
		let catalog = catalog.clone();
		Memo::new(move |_| selection.with(|sel| scene_nodes(sel, &catalog, show_related.get())))
	};
	let placed = {
		let layout = config.layout.clone();
		Memo::new(move |_| {
			let (w, h) = size.get();
			scene.with(|nodes| radial_layout(nodes, w, h, &layout))
		})
	};
	let edges = {
		let catalog = catalog.clone();
		let view_config = config.view.clone();
		Memo::new(move |_| {
			let active = active_types.get();
			scene.with(|nodes| {
				let relevant = relevant_relationships(&catalog, nodes, &active);
				placed.with(|placed| route_all(&catalog, relevant, placed, &view_config))
			})
		})
	};

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = container_size(&container);
		state.update(|s| s.resize(w, h));

		// Unregistered with the view.
		let resize = window_event_listener(ev::resize, move |_| {
			if let Some(container) = container_ref.get_untracked() {
				let (nw, nh) = container_size(&container);
				let _ = state.try_update(|s| s.resize(nw, nh));
			}
		});
		on_cleanup(move || resize.remove());

		let animate_inner = animate.clone();
		*animate.borrow_mut() = Some(Closure::new(move || {
			// The view is gone once its signal is disposed.
			let Some(animating) = state.try_with_untracked(|s| s.is_animating()) else {
				return;
			};
			if animating {
				let now = now_ms();
				state.update(|s| {
					s.tick(now);
				});
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(container_ref, &ev) {
			state.update(|s| s.begin_pan(x, y));
		}
	};

	let on_mousemove = move |ev: MouseEvent| {
		if !state.with_untracked(|s| s.pan.active) {
			return;
		}
		if let Some((x, y)) = local_point(container_ref, &ev) {
			state.update(|s| {
				s.pan_to(x, y);
			});
		}
	};

	let end_pan = move |_: MouseEvent| {
		if state.with_untracked(|s| s.pan.active) {
			state.update(|s| s.end_pan());
		}
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = local_point(container_ref, &ev) {
			state.update(|s| s.zoom_at(x, y, ev.delta_y()));
		}
	};

	let markers = move || {
		edges
			.get()
			.into_iter()
			.filter_map(|edge| {
				let id = edge.marker_id()?;
				Some(view! {
					<marker
						id=id
						viewBox="0 0 10 10"
						refX="9"
						refY="5"
						markerWidth="6"
						markerHeight="6"
						orient="auto"
					>
						<path d="M 0 0 L 10 5 L 0 10 z" fill=edge.color />
					</marker>
				})
			})
			.collect_view()
	};

	let edge_views = move || {
		edges
			.get()
			.into_iter()
			.map(|edge| {
				let lit = {
					let edge = edge.clone();
					Signal::derive(move || state.with(|s| s.is_edge_highlighted(&edge)))
				};
				let (id, relationship) = (edge.id.clone(), edge.relationship.clone());
				let on_enter = move |ev: MouseEvent| {
					let pointer = local_point(container_ref, &ev).unwrap_or_default();
					state.update(|s| s.hover_relationship(Some(id.clone()), pointer));
				};
				let on_leave = move |_: MouseEvent| {
					state.update(|s| {
						let pointer = s.hover.pointer;
						s.hover_relationship(None, pointer);
					});
				};
				let on_click = move |ev: MouseEvent| {
					ev.stop_propagation();
					state.update(|s| s.click_relationship(&relationship));
				};
				let marker_end = edge.marker_id().map(|id| format!("url(#{id})"));
				let (glow_path, glow_width) = (edge.path.clone(), (edge.stroke_width * 2.0).to_string());
				let color = edge.color;
				view! {
					<g class="radial-edge">
						<path
							d=edge.path.clone()
							fill="none"
							stroke=edge.color
							stroke-width=edge.stroke_width.to_string()
							stroke-dasharray=edge.dash
							opacity=move || edge_opacity(lit.get()).to_string()
							marker-end=marker_end
						/>
						<Show when=move || lit.get()>
							<path
								d=glow_path.clone()
								fill="none"
								stroke=color
								stroke-width=glow_width.clone()
								opacity="0.1"
								style="filter: blur(4px)"
							/>
						</Show>
						<path
							d=edge.path.clone()
							fill="none"
							stroke="transparent"
							stroke-width=edge.hit_width.to_string()
							style="cursor: pointer"
							on:mousedown=|ev: MouseEvent| ev.stop_propagation()
							on:mouseenter=on_enter
							on:mouseleave=on_leave
							on:click=on_click
						/>
					</g>
				}
			})
			.collect_view()
	};

	let node_views = move || {
		placed
			.get()
			.into_iter()
			.map(|pn| {
				let (x, y, related) = (pn.x, pn.y, pn.related);
				let (width, height) = (pn.width(), pn.height());
				let (stroke, stroke_width) = node_stroke(related);
				let (key_opacity, key_hover) = (pn.key.clone(), pn.key.clone());
				let opacity = move || state.with(|s| s.node_opacity(&key_opacity, related)).to_string();
				let (name_class, type_class) = if related {
					("node-name related", "node-type related")
				} else {
					("node-name", "node-type")
				};
				view! {
					<g
						class="radial-node"
						transform=format!("translate({x},{y})")
						style="cursor: pointer"
						on:mousedown=|ev: MouseEvent| ev.stop_propagation()
						on:click=move |_| {
							let now = now_ms();
							state.update(|s| s.focus_on(x, y, now));
						}
						on:mouseenter=move |_| state.update(|s| s.hover_node(Some(key_hover.clone())))
						on:mouseleave=move |_| state.update(|s| s.hover_node(None))
					>
						<rect
							x=(-width / 2.0).to_string()
							y=(-height / 2.0).to_string()
							width=width.to_string()
							height=height.to_string()
							rx="4"
							fill=node_fill(pn.node.node_type, related)
							stroke=stroke
							stroke-width=stroke_width.to_string()
							opacity=opacity
						/>
						<text
							text-anchor="middle"
							dy="-0.1em"
							class=name_class
						>
							{pn.node.name.clone()}
						</text>
						<text
							text-anchor="middle"
							dy="1.2em"
							class=type_class
						>
							{pn.node.node_type.label()}
						</text>
					</g>
				}
			})
			.collect_view()
	};

	let tooltip = move || {
		let (id, pointer) = state.with(|s| (s.hover.relationship.clone(), s.hover.pointer));
		let id = id?;
		let edge = edges.with(|edges| edges.iter().find(|e| e.id == id).cloned())?;
		Some(view! { <RelationshipTooltip relationship=edge.relationship pointer=pointer /> })
	};

	let details = move || {
		state
			.with(|s| s.selected_relationship.clone())
			.map(|relationship| view! { <RelationshipDetails relationship=relationship /> })
	};

	let legend_active = Signal::derive(move || active_types.with(|types| types.iter().copied().collect::<Vec<_>>()));
	let toggle_class = move || if show_related.get() { "expand-toggle on" } else { "expand-toggle" };
	let toggle_label = move || if show_related.get() { "Hide Related" } else { "Go Deeper" };
	let on_toggle_type = Callback::new(move |kind| state.update(|s| s.toggle_type(kind)));

	view! {
		<div node_ref=container_ref class="radial-view">
			<div class="radial-toolbar">
				<button
					class=toggle_class
					on:click=move |_| state.update(|s| s.toggle_related())
				>
					{toggle_label}
				</button>
			</div>

			<svg
				width="100%"
				height="100%"
				class="radial-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=end_pan
				on:mouseleave=end_pan
				on:wheel=on_wheel
			>
				<defs>
					<pattern id="grid" width="40" height="40" patternUnits="userSpaceOnUse">
						<path d="M 40 0 L 0 0 0 40" fill="none" stroke="rgb(243 244 246)" stroke-width="1" />
					</pattern>
					{markers}
				</defs>
				<rect width="100%" height="100%" fill="url(#grid)" opacity="0.5" />
				<g transform=move || state.with(|s| s.transform.to_svg())>
					<g class="edges">{edge_views}</g>
					<g class="nodes">{node_views}</g>
				</g>
			</svg>

			<Show when=move || selection.with(|sel| sel.is_empty())>
				<p class="radial-empty">"Select entities in the tree panels to see how they relate."</p>
			</Show>

			<Legend active=legend_active on_toggle=on_toggle_type />
			{tooltip}
			{details}
		</div>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use std::cell::Cell;

	use wasm_bindgen_test::*;

	use super::*;
	use crate::catalog::fixture;

	wasm_bindgen_test_configure!(run_in_browser);

	async fn settle() {
		for _ in 0..3 {
			leptos::task::tick().await;
		}
	}

	#[wasm_bindgen_test]
	async fn window_resize_after_leaving_the_view_is_harmless() {
		let _ = leptos::task::Executor::init_wasm_bindgen();
		let window = web_sys::window().expect("window");

		let errors = Rc::new(Cell::new(0u32));
		let on_error = {
			let errors = errors.clone();
			Closure::<dyn FnMut()>::new(move || errors.set(errors.get() + 1))
		};
		window
			.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
			.expect("error listener");

		let catalog = Arc::new(fixture::catalog());
		let selection = RwSignal::new(Selection::new());
		let shown = RwSignal::new(true);
		let _mounted = leptos::mount::mount_to_body(move || {
			let catalog = catalog.clone();
			view! {
				<Show when=move || shown.get()>
					<RadialView catalog=catalog.clone() selection=selection />
				</Show>
			}
		});
		settle().await;

		// Leave and come back once, then resize with the view gone.
		shown.set(false);
		settle().await;
		shown.set(true);
		settle().await;
		shown.set(false);
		settle().await;

		let resize = web_sys::Event::new("resize").expect("resize event");
		window.dispatch_event(&resize).expect("dispatch");
		assert_eq!(errors.get(), 0);

		window
			.remove_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
			.expect("remove error listener");
	}
}
