use std::collections::{HashMap, HashSet};

use super::blocked::EdgeKey;
use crate::graph::{GraphData, StarId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeClass {
	pub on_route: bool,
	pub is_current: bool,
	pub is_visited: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeClass {
	pub on_route: bool,
}

/// Where the simulated donkey is and where it has been.
#[derive(Clone, Debug, PartialEq)]
pub struct Traversal {
	pub current: Option<StarId>,
	pub visited: Vec<StarId>,
	pub alive: bool,
}

impl Default for Traversal {
	fn default() -> Self {
		Self {
			current: None,
			visited: Vec::new(),
			alive: true,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteHighlight {
	pub nodes: HashMap<StarId, NodeClass>,
	pub edges: HashMap<EdgeKey, EdgeClass>,
}

impl RouteHighlight {
	pub fn node(&self, id: StarId) -> NodeClass {
		self.nodes.get(&id).copied().unwrap_or_default()
	}

	pub fn edge(&self, a: StarId, b: StarId) -> EdgeClass {
		self.edges
			.get(&EdgeKey::new(a, b))
			.copied()
			.unwrap_or_default()
	}
}

/// Derives per-star and per-edge highlight state from scratch.
///
/// Parallel edges between the same pair share a key and are all on-route
/// together. Consecutive route stars with no edge between them simply
/// highlight nothing.
pub fn classify(graph: &GraphData, route: &[StarId], traversal: &Traversal) -> RouteHighlight {
	let on_route: HashSet<StarId> = route.iter().copied().collect();
	let hops: HashSet<EdgeKey> = route
		.windows(2)
		.map(|hop| EdgeKey::new(hop[0], hop[1]))
		.collect();
	let visited: HashSet<StarId> = traversal.visited.iter().copied().collect();

	let nodes = graph
		.nodes
		.iter()
		.map(|n| {
			let is_current = traversal.current == Some(n.id);
			let class = NodeClass {
				on_route: on_route.contains(&n.id),
				is_current,
				is_visited: visited.contains(&n.id) && !is_current,
			};
			(n.id, class)
		})
		.collect();

	let edges = graph
		.links
		.iter()
		.map(|l| {
			let key = EdgeKey::new(l.source, l.target);
			(
				key,
				EdgeClass {
					on_route: hops.contains(&key),
				},
			)
		})
		.collect();

	RouteHighlight { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::GraphLink;
	use crate::test_helpers::sample_graph;

	fn ids(v: &[i64]) -> Vec<StarId> {
		v.iter().copied().map(StarId).collect()
	}

	#[test]
	fn classifies_route_current_and_visited() {
		let graph = sample_graph();
		let traversal = Traversal {
			current: Some(StarId(2)),
			visited: ids(&[1, 2]),
			alive: true,
		};
		let hl = classify(&graph, &ids(&[1, 2, 3]), &traversal);

		let class = |on_route, is_current, is_visited| NodeClass {
			on_route,
			is_current,
			is_visited,
		};
		assert_eq!(hl.node(StarId(1)), class(true, false, true));
		assert_eq!(hl.node(StarId(2)), class(true, true, false));
		assert_eq!(hl.node(StarId(3)), class(true, false, false));
		assert_eq!(hl.node(StarId(4)), class(false, false, false));
	}

	#[test]
	fn empty_route_highlights_nothing() {
		let graph = sample_graph();
		let hl = classify(&graph, &[], &Traversal::default());
		assert_eq!(hl.nodes.len(), graph.nodes.len());
		assert!(hl.nodes.values().all(|c| *c == NodeClass::default()));
		assert!(hl.edges.values().all(|c| !c.on_route));
	}

	#[test]
	fn non_adjacent_hops_are_tolerated() {
		let graph = sample_graph();
		// 5-2 has no edge; 1-3 does
		let hl = classify(&graph, &ids(&[5, 2, 1, 3]), &Traversal::default());
		assert!(hl.edge(StarId(3), StarId(1)).on_route);
		assert!(hl.edge(StarId(1), StarId(2)).on_route);
		assert!(!hl.edge(StarId(3), StarId(5)).on_route);
		assert_eq!(hl.edges.values().filter(|e| e.on_route).count(), 2);
	}

	#[test]
	fn parallel_edges_share_the_highlight() {
		let mut graph = sample_graph();
		graph.links.push(GraphLink {
			source: StarId(3),
			target: StarId(1),
			distance: 7.0,
		});
		let hl = classify(&graph, &ids(&[1, 3]), &Traversal::default());
		assert!(hl.edge(StarId(1), StarId(3)).on_route);
	}

	#[test]
	fn current_star_off_route_is_still_current() {
		let graph = sample_graph();
		let traversal = Traversal {
			current: Some(StarId(4)),
			visited: ids(&[4]),
			alive: false,
		};
		let hl = classify(&graph, &ids(&[1, 3]), &traversal);
		let class = hl.node(StarId(4));
		assert!(class.is_current && !class.is_visited && !class.on_route);
	}
}
