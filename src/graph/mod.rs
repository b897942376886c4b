//! Star graph data model and viewport scaling.

mod scale;
mod types;

pub use scale::{ScaledLayout, Viewport, normalize};
pub use types::{BlockedPathEntry, GraphData, StarId, format_route};

#[cfg(test)]
pub(crate) use types::{GraphLink, GraphNode};
