mod component;
/// Ring placement.
pub mod layout;
mod render;
/// Edge paths and styles.
pub mod routing;
/// Which nodes and relationships are drawn.
pub mod scene;
/// Camera and interaction state.
pub mod state;
mod types;

pub use component::RadialView;
pub use types::{GraphNode, PositionedNode};
