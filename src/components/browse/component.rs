use std::sync::Arc;

use leptos::ev::{Event, KeyboardEvent, MouseEvent};
use leptos::prelude::*;

use crate::catalog::{Catalog, NodeMetadata, NodeType, TreeNode};
use crate::config::SearchConfig;

use super::filter::TypeFilter;
use super::selection::{Panel, Selection};

fn join(values: &[String]) -> Option<String> {
	(!values.is_empty()).then(|| values.join(", "))
}

/// Label/value rows shown when a tree row is expanded.
pub fn metadata_rows(metadata: &NodeMetadata) -> Vec<(&'static str, String)> {
	let mut rows = Vec::new();
	let mut push = |label: &'static str, value: Option<String>| {
		if let Some(value) = value {
			rows.push((label, value));
		}
	};
	match metadata {
		NodeMetadata::Course(course) => {
			push("Instructor", join(&course.faculty));
			push("Teaching Assistants", join(&course.teaching_assistants));
			push("Prerequisites", join(&course.prerequisites));
			push("Lab", course.lab.clone());
			push("Credit Hours", course.credit_hours.map(|h| h.to_string()));
			push("Terms", join(&course.terms_offered));
			push("Format", course.format.map(|f| f.label().to_string()));
			push("Class Size", course.typical_class_size.map(|n| n.to_string()));
			push("Average GPA", course.avg_gpa.map(|g| format!("{g:.2}")));
			push("Success Rate", course.success_rate.clone());
			push("Topics", join(&course.topics));
		}
		NodeMetadata::Program(program) => {
			push("Credit Hours", program.credit_hours.map(|h| h.to_string()));
			push("Duration", program.duration.clone());
			push("Tuition", program.tuition.map(|t| format!("${t}")));
			if let Some(outcomes) = &program.career_outcomes {
				push("Career Roles", join(&outcomes.roles));
				push("Employers", join(&outcomes.companies));
				push("Employment Rate", Some(outcomes.employment_rate.clone()).filter(|r| !r.is_empty()));
			}
			if let Some(admission) = &program.admission_info {
				push("Minimum GPA", Some(format!("{:.1}", admission.gpa_requirement)));
				let deadlines: Vec<String> = admission
					.deadlines
					.iter()
					.map(|(term, date)| format!("{term}: {date}"))
					.collect();
				push("Deadlines", join(&deadlines));
			}
		}
		NodeMetadata::Faculty(faculty) => {
			push("Research Areas", join(&faculty.research_areas));
		}
	}
	rows
}

fn row_class(node_type: NodeType) -> &'static str {
	match node_type {
		NodeType::College => "tree-row college",
		NodeType::Department => "tree-row department",
		NodeType::Program => "tree-row program",
		NodeType::Course => "tree-row course",
		NodeType::Faculty => "tree-row faculty",
	}
}

/// One catalog tree for a panel.
#[component]
pub fn TreePanel(
	#[prop(into)] forest: Signal<Vec<TreeNode>>,
	panel: Panel,
	#[prop(into)] selection: Signal<Selection>,
	/// Receives the toggled node's id and this panel.
	on_toggle: Callback<(String, Panel)>,
) -> impl IntoView {
	view! {
		<div class="tree-panel">
			{move || {
				forest
					.get()
					.into_iter()
					.map(|node| {
						view! { <TreeItem node=node panel=panel level=0 selection=selection on_toggle=on_toggle /> }
					})
					.collect_view()
			}}
		</div>
	}
}

#[component]
fn TreeItem(
	node: TreeNode,
	panel: Panel,
	level: usize,
	selection: Signal<Selection>,
	on_toggle: Callback<(String, Panel)>,
) -> AnyView {
	let expanded = RwSignal::new(false);
	let has_children = node.has_children();
	let node_type = node.node_type;

	let is_selected = {
		let id = node.id.clone();
		Signal::derive(move || selection.with(|s| s.contains(panel, &id)))
	};
	let partial = {
		let node = node.clone();
		Signal::derive(move || selection.with(|s| s.has_selected_descendant(&node, panel)))
	};

	let id = node.id.clone();
	let on_check = move |ev: MouseEvent| {
		ev.stop_propagation();
		if has_children && !is_selected.get_untracked() {
			expanded.set(true);
		}
		on_toggle.run((id.clone(), panel));
	};
	let on_expand = move |ev: MouseEvent| {
		ev.stop_propagation();
		expanded.update(|e| *e = !*e);
	};

	let class = move || {
		let ring = if is_selected.get() || partial.get() { " ring" } else { "" };
		format!("{}{ring}", row_class(node_type))
	};
	let check_class = move || match (is_selected.get(), partial.get()) {
		(true, _) => "check checked",
		(false, true) => "check partial",
		_ => "check",
	};
	let check_mark = move || match (is_selected.get(), partial.get()) {
		(true, _) => "✓",
		(false, true) => "−",
		_ => "",
	};

	let rows = node.metadata.as_ref().map(metadata_rows).unwrap_or_default();
	let has_rows = !rows.is_empty();
	let child_level = level + 1;
	let TreeNode {
		name,
		code,
		description,
		children,
		..
	} = node;

	view! {
		<div class="tree-item">
			<div class=class style=format!("margin-left: {}px", level * 20)>
				<div class="expander">
					{has_children
						.then(|| {
							view! {
								<button on:click=on_expand>
									{move || if expanded.get() { "▾" } else { "▸" }}
								</button>
							}
						})}
				</div>
				<button class=check_class on:click=on_check>
					{check_mark}
				</button>
				<div class="tree-content">
					<div class="tree-heading">
						<span class="name">{name}</span>
						{code.map(|code| view! { <span class="code">{format!("({code})")}</span> })}
						<span class="badge">{node_type.label()}</span>
					</div>
					{description.map(|d| view! { <p class="description">{d}</p> })}
					<Show when=move || has_rows && expanded.get()>
						<div class="metadata">
							{rows
								.iter()
								.map(|(label, value)| {
									view! {
										<p>
											<span class="label">{format!("{label}:")}</span>
											" "
											{value.clone()}
										</p>
									}
								})
								.collect_view()}
						</div>
					</Show>
				</div>
			</div>
			<Show when=move || has_children && expanded.get()>
				<div class="tree-children">
					{children
						.iter()
						.cloned()
						.map(|child| {
							view! {
								<TreeItem
									node=child
									panel=panel
									level=child_level
									selection=selection
									on_toggle=on_toggle
								/>
							}
						})
						.collect_view()}
				</div>
			</Show>
		</div>
	}
	.into_any()
}

/// Single-choice node type filter.
#[component]
pub fn FilterSection(filter: RwSignal<TypeFilter>) -> impl IntoView {
	let options = [
		(NodeType::College, "Colleges"),
		(NodeType::Department, "Departments"),
		(NodeType::Program, "Programs"),
		(NodeType::Course, "Courses"),
	];
	view! {
		<div class="filter-section">
			<h3>"Filters"</h3>
			{options
				.into_iter()
				.map(|(node_type, label)| {
					view! {
						<label class="filter-option">
							<input
								type="radio"
								name="node-type-filter"
								prop:checked=move || filter.with(|f| f.single() == Some(node_type))
								on:change=move |_| filter.set(TypeFilter::only(node_type))
							/>
							<span>{label}</span>
						</label>
					}
				})
				.collect_view()}
			<label class="filter-option">
				<input
					type="radio"
					name="node-type-filter"
					prop:checked=move || filter.with(|f| f.is_empty())
					on:change=move |_| filter.set(TypeFilter::all())
				/>
				<span>"Show All"</span>
			</label>
		</div>
	}
}

/// Filters, mode switch and the list of selected entities.
#[component]
pub fn SidePanel(
	selection: RwSignal<Selection>,
	filter: RwSignal<TypeFilter>,
	#[prop(into)] exploring: Signal<bool>,
	on_explore: Callback<()>,
	on_back: Callback<()>,
) -> impl IntoView {
	let selected_rows = move || {
		selection.with(|s| {
			s.iter()
				.map(|(key, entry)| {
					(
						key.to_string(),
						entry.node.id.clone(),
						entry.node.name.clone(),
						entry.node.node_type,
						entry.panel,
					)
				})
				.collect::<Vec<_>>()
		})
	};

	view! {
		<aside class="side-panel">
			<h2>"Configuration"</h2>
			<p class="hint">
				"Use filters to focus on specific types of academic entities. This helps narrow down your search across both views."
			</p>
			<FilterSection filter=filter />

			<Show when=move || exploring.get()>
				<button class="primary" on:click=move |_| on_back.run(())>
					"← Back to Browse Mode"
				</button>
			</Show>
			<Show when=move || !exploring.get() && !selection.with(|s| s.is_empty())>
				<button class="primary" on:click=move |_| on_explore.run(())>
					"Explore Relationships"
				</button>
			</Show>

			<h3>"Selected Items"</h3>
			<p class="hint">
				"Items you select from either view will appear here. Select multiple items to discover their relationships in Relationship Mode."
			</p>
			<ul class="selected-list">
				<For each=selected_rows key=|row| row.0.clone() let:row>
					{
						let (_, id, name, node_type, panel) = row;
						view! {
							<li>
								<span class="name">{name}</span>
								<span class="badge">{format!("({})", node_type.label())}</span>
								<button
									class="remove"
									on:click=move |_| selection.update(|s| s.remove(&id, panel))
								>
									"×"
								</button>
							</li>
						}
					}
				</For>
			</ul>
		</aside>
	}
}

/// Fuzzy search over the catalog. Picking a result hands the full node to
/// `on_select`.
#[component]
pub fn SearchBar(
	catalog: Arc<Catalog>,
	#[prop(default = SearchConfig::default())] config: SearchConfig,
	on_select: Callback<TreeNode>,
) -> impl IntoView {
	let query = RwSignal::new(String::new());
	let open = RwSignal::new(false);
	let min_len = config.min_query_len;
	let results = Memo::new(move |_| {
		query.with(|q| {
			catalog
				.search(q, &config)
				.into_iter()
				.cloned()
				.collect::<Vec<_>>()
		})
	});

	let on_input = move |ev: Event| {
		let value = event_target_value(&ev);
		open.set(value.trim().chars().count() >= min_len);
		query.set(value);
	};
	let clear = move |_: MouseEvent| {
		query.set(String::new());
		open.set(false);
	};
	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Escape" {
			open.set(false);
		}
	};

	view! {
		<div class="search-bar">
			<div class="search-input">
				<input
					type="text"
					placeholder="Search for courses, faculty, or programs..."
					prop:value=move || query.get()
					on:input=on_input
					on:keydown=on_keydown
				/>
				<Show when=move || query.with(|q| !q.is_empty())>
					<button class="clear" on:click=clear>
						"×"
					</button>
				</Show>
			</div>
			<Show when=move || open.get()>
				<div class="search-results">
					{move || {
						let hits = results.get();
						if hits.is_empty() {
							return view! { <p class="no-results">"No results found"</p> }.into_any();
						}
						hits.into_iter()
							.map(|node| {
								let (name, node_type, description) = (
									node.name.clone(),
									node.node_type,
									node.description.clone(),
								);
								view! {
									<button
										class="search-result"
										on:click=move |_| {
											on_select.run(node.clone());
											query.set(String::new());
											open.set(false);
										}
									>
										<div class="result-heading">
											<span class="name">{name}</span>
											<span class="type">{node_type.as_str()}</span>
										</div>
										{description.map(|d| view! { <p class="description">{d}</p> })}
									</button>
								}
							})
							.collect_view()
							.into_any()
					}}
				</div>
			</Show>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::fixture;

	#[test]
	fn course_rows_skip_missing_fields() {
		let catalog = fixture::catalog();
		let hci = catalog.node("course-hci").expect("course-hci");
		let rows = metadata_rows(hci.metadata.as_ref().expect("course metadata"));
		let labels: Vec<&str> = rows.iter().map(|(label, _)| *label).collect();

		assert!(labels.contains(&"Teaching Assistants"));
		assert!(labels.contains(&"Format"));
		let tas = rows.iter().find(|(label, _)| *label == "Teaching Assistants");
		assert_eq!(tas.map(|(_, v)| v.as_str()), Some("phd-garcia, phd-lee"));
	}

	#[test]
	fn program_rows_list_deadlines_in_term_order() {
		let catalog = fixture::catalog();
		let bscs = catalog.node("prog-bs-cs").expect("prog-bs-cs");
		let rows = metadata_rows(bscs.metadata.as_ref().expect("program metadata"));

		let credit = rows.iter().find(|(label, _)| *label == "Credit Hours");
		assert_eq!(credit.map(|(_, v)| v.as_str()), Some("120"));
		let deadlines = rows
			.iter()
			.find(|(label, _)| *label == "Deadlines")
			.map(|(_, v)| v.clone())
			.unwrap_or_default();
		assert!(deadlines.contains("Fall: May 1"), "{deadlines}");
	}

	#[test]
	fn empty_faculty_metadata_has_no_rows() {
		let metadata = NodeMetadata::Faculty(Default::default());
		assert!(metadata_rows(&metadata).is_empty());
	}
}
