//! Declarative view state handed to whatever draws the graph.

use super::blocked::{BlockedEdgeSet, EdgeKey};
use super::highlight::{NodeClass, RouteHighlight};
use crate::graph::{GraphData, ScaledLayout, StarId};

#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
	pub id: StarId,
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub color: String,
	pub hypergiant: bool,
	pub shared: bool,
	pub constellations: Vec<String>,
	pub class: NodeClass,
}

impl NodeView {
	/// Everything but the highlight class matches.
	fn same_star(&self, other: &NodeView) -> bool {
		self.id == other.id
			&& self.label == other.label
			&& self.x == other.x
			&& self.y == other.y
			&& self.radius == other.radius
			&& self.color == other.color
			&& self.hypergiant == other.hypergiant
			&& self.shared == other.shared
			&& self.constellations == other.constellations
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeView {
	pub key: EdgeKey,
	pub source: StarId,
	pub target: StarId,
	pub distance: f64,
	pub on_route: bool,
	pub blocked: bool,
}

impl EdgeView {
	fn same_edge(&self, other: &EdgeView) -> bool {
		self.source == other.source
			&& self.target == other.target
			&& self.distance == other.distance
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewSnapshot {
	pub nodes: Vec<NodeView>,
	pub edges: Vec<EdgeView>,
	pub current: Option<StarId>,
	pub has_route: bool,
	pub alive: bool,
}

impl ViewSnapshot {
	pub fn build(
		graph: &GraphData,
		layout: &ScaledLayout,
		highlight: &RouteHighlight,
		blocked: &BlockedEdgeSet,
		current: Option<StarId>,
		alive: bool,
	) -> Self {
		let nodes = graph
			.nodes
			.iter()
			.filter_map(|n| {
				let (x, y) = layout.position(n.id)?;
				Some(NodeView {
					id: n.id,
					label: n.label.clone(),
					x,
					y,
					radius: n.radius,
					color: n.color.clone(),
					hypergiant: n.hypergiant,
					shared: n.shared(),
					constellations: n.constellations.clone(),
					class: highlight.node(n.id),
				})
			})
			.collect();

		let edges = graph
			.links
			.iter()
			.map(|l| {
				let key = EdgeKey::new(l.source, l.target);
				EdgeView {
					key,
					source: l.source,
					target: l.target,
					distance: l.distance,
					on_route: highlight.edge(l.source, l.target).on_route,
					blocked: blocked.is_blocked(l.source, l.target),
				}
			})
			.collect();

		Self {
			nodes,
			edges,
			current,
			has_route: highlight.nodes.values().any(|c| c.on_route),
			alive,
		}
	}

	#[cfg(test)]
	pub fn node(&self, id: StarId) -> Option<&NodeView> {
		self.nodes.iter().find(|n| n.id == id)
	}

	#[cfg(test)]
	pub fn edge(&self, key: EdgeKey) -> Option<&EdgeView> {
		self.edges.iter().find(|e| e.key == key)
	}

	/// True when the two snapshots differ only in highlight, blocking and
	/// donkey state, so a renderer can restyle in place instead of rebuilding.
	pub fn same_shape(&self, other: &ViewSnapshot) -> bool {
		self.nodes.len() == other.nodes.len()
			&& self.edges.len() == other.edges.len()
			&& self.nodes.iter().zip(&other.nodes).all(|(a, b)| a.same_star(b))
			&& self.edges.iter().zip(&other.edges).all(|(a, b)| a.same_edge(b))
	}
}
