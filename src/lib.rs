//! Academic Compass: a dual-panel catalog browser with a radial
//! relationship graph, rendered client-side with Leptos.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod catalog;
/// Browse and radial view components.
pub mod components;
pub mod config;
mod pages;

use crate::config::ExplorerConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Console logger level for the browser build.
const LOG_LEVEL: Level = Level::Debug;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(LOG_LEVEL);
	console_error_panic_hook::set_once();
	info!("{} {} starting", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}

/// Application shell: document metadata, explorer tunables and routes.
///
/// The explorer reads its [`ExplorerConfig`] from context, so embedders can
/// wrap `App` and provide their own before it renders.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	if use_context::<ExplorerConfig>().is_none() {
		provide_context(ExplorerConfig::default());
	}

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Academic Compass" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta
			name="description"
			content="Browse colleges, programs, courses and faculty, and see how they connect."
		/>

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
