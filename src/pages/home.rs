use std::sync::Arc;

use leptos::prelude::*;
use log::{error, info, warn};

use crate::catalog::{Catalog, CatalogError, TreeNode};
use crate::components::browse::{Panel, SearchBar, Selection, SidePanel, TreePanel, TypeFilter, filter_forest};
use crate::components::radial::RadialView;
use crate::config::ExplorerConfig;

/// Loads the embedded catalog once per page mount.
fn load_catalog() -> Result<Arc<Catalog>, Arc<CatalogError>> {
	match Catalog::builtin() {
		Ok(catalog) => {
			info!("catalog ready: {} root nodes", catalog.forest().len());
			Ok(Arc::new(catalog))
		}
		Err(err) => {
			error!("catalog failed to load: {err}");
			Err(Arc::new(err))
		}
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let catalog = load_catalog();
	let config = use_context::<ExplorerConfig>().unwrap_or_default();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"The academic catalog could not be loaded"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{move || catalog.clone().map(|catalog| view! { <Explorer catalog=catalog config=config.clone() /> })}
		</ErrorBoundary>
	}
}

/// Browse and relationship modes over one shared selection.
#[component]
fn Explorer(
	catalog: Arc<Catalog>,
	config: ExplorerConfig,
) -> impl IntoView {
	let selection = RwSignal::new(Selection::new());
	let filter = RwSignal::new(TypeFilter::all());
	let exploring = RwSignal::new(false);

	let forest = {
		let catalog = catalog.clone();
		Memo::new(move |_| filter.with(|f| filter_forest(catalog.forest(), f).into_owned()))
	};

	// Rows from a filtered tree toggle the full catalog node so cascades
	// reach descendants the filter hides.
	let on_toggle = {
		let catalog = catalog.clone();
		Callback::new(move |(id, panel): (String, Panel)| {
			let Some(node) = catalog.node(&id) else {
				warn!("toggled node {id} is not in the catalog");
				return;
			};
			selection.update(|s| s.select(node, panel));
		})
	};
	let on_search_select = Callback::new(move |node: TreeNode| selection.update(|s| s.select_from_search(&node)));
	let on_explore = Callback::new(move |_: ()| exploring.set(true));
	let on_back = Callback::new(move |_: ()| exploring.set(false));

	let panel_view = move |panel: Panel, title: &'static str| {
		view! {
			<section class="browse-panel">
				<header>
					<h2>{title}</h2>
					<span class="count">{move || format!("{} selected", selection.with(|s| s.count(panel)))}</span>
				</header>
				<TreePanel forest=forest panel=panel selection=selection on_toggle=on_toggle />
			</section>
		}
	};

	let main_view = move || {
		if exploring.get() {
			view! {
				<RadialView catalog=catalog.clone() selection=selection config=config.clone() />
			}
			.into_any()
		} else {
			view! {
				<div class="browse-mode">
					<SearchBar catalog=catalog.clone() config=config.search.clone() on_select=on_search_select />
					<div class="browse-panels">
						{panel_view(Panel::Left, "Primary View")}
						{panel_view(Panel::Right, "Secondary View")}
					</div>
				</div>
			}
			.into_any()
		}
	};

	view! {
		<div class="explorer">
			<header class="explorer-header">
				<h1>"Academic Compass"</h1>
				<span class="mode">{move || if exploring.get() { "Relationship Mode" } else { "Browse Mode" }}</span>
			</header>
			<div class="explorer-body">
				<SidePanel
					selection=selection
					filter=filter
					exploring=exploring
					on_explore=on_explore
					on_back=on_back
				/>
				<main class="explorer-main">{main_view}</main>
			</div>
		</div>
	}
}
