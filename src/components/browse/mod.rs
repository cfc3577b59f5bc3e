mod component;
mod filter;
mod selection;

pub use component::{FilterSection, SearchBar, SidePanel, TreePanel, metadata_rows};
pub use filter::{TypeFilter, filter_forest};
pub use selection::{Panel, SelectedNode, Selection, SelectionKey};
