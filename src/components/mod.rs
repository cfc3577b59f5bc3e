/// Tree panels, filters, search and the selection model.
pub mod browse;
/// Radial relationship graph.
pub mod radial;
