use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::graph::StarId;
use crate::reconcile::{EdgeKey, EdgeView, NodeClass, ViewSnapshot};

/// How long stars glide from the seed circle to their fixed positions.
pub const SETTLE_SECS: f64 = 1.0;
/// Extra world-space slack around edges when hit testing.
pub const EDGE_HIT: f64 = 5.0;

/// On-canvas radius of a star with data radius `r`.
pub fn star_radius(r: f64) -> f64 {
	5.0 + r.max(0.0) * 8.0
}

#[derive(Clone, Debug, Default)]
pub struct StarInfo {
	pub id: StarId,
	pub label: String,
	pub color: String,
	pub radius: f64,
	pub hypergiant: bool,
	pub shared: bool,
	pub constellations: Vec<String>,
	pub class: NodeClass,
	target: (f32, f32),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeStyle {
	pub on_route: bool,
	pub blocked: bool,
	pub distance: f64,
}

impl From<&EdgeView> for EdgeStyle {
	fn from(e: &EdgeView) -> Self {
		Self {
			on_route: e.on_route,
			blocked: e.blocked,
			distance: e.distance,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Something under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
	Star(StarId),
	Edge(EdgeKey),
}

pub struct ForceGraphState {
	pub graph: ForceGraph<StarInfo, ()>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub current: Option<StarId>,
	pub alive: bool,
	settle_t: f64,
	edges: HashMap<(DefaultNodeIdx, DefaultNodeIdx), EdgeKey>,
	edge_styles: HashMap<EdgeKey, EdgeStyle>,
	index: HashMap<StarId, DefaultNodeIdx>,
	snapshot: ViewSnapshot,
}

impl ForceGraphState {
	/// Seeds every star on a circle around the centre; [`tick`](Self::tick)
	/// then glides them onto the snapshot's positions.
	pub fn new(snapshot: &ViewSnapshot, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut index = HashMap::new();
		let count = snapshot.nodes.len().max(1) as f64;
		let (cx, cy) = (width / 2.0, height / 2.0);

		for (i, node) in snapshot.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let idx = graph.add_node(NodeData {
				x: (cx + 100.0 * angle.cos()) as f32,
				y: (cy + 100.0 * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: StarInfo {
					id: node.id,
					label: node.label.clone(),
					color: node.color.clone(),
					radius: star_radius(node.radius),
					hypergiant: node.hypergiant,
					shared: node.shared,
					constellations: node.constellations.clone(),
					class: node.class,
					target: (node.x as f32, node.y as f32),
				},
			});
			index.insert(node.id, idx);
		}

		let mut edges = HashMap::new();
		let mut edge_styles = HashMap::new();
		for edge in &snapshot.edges {
			if let (Some(&src), Some(&tgt)) = (index.get(&edge.source), index.get(&edge.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.insert((src, tgt), edge.key);
				edge_styles.insert(edge.key, EdgeStyle::from(edge));
			}
		}

		Self {
			graph,
			transform: ViewTransform { x: 0.0, y: 0.0, k: 1.0 },
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			current: snapshot.current,
			alive: snapshot.alive,
			settle_t: 0.0,
			edges,
			edge_styles,
			index,
			snapshot: snapshot.clone(),
		}
	}

	pub fn settled(&self) -> bool {
		self.settle_t >= SETTLE_SECS
	}

	/// Takes a new snapshot. A change of highlight only restyles in place;
	/// different stars or edges rebuild and settle again. View transform is
	/// kept either way.
	pub fn apply(&mut self, snapshot: &ViewSnapshot) {
		if !self.snapshot.same_shape(snapshot) {
			let transform = std::mem::take(&mut self.transform);
			*self = Self::new(snapshot, self.width, self.height);
			self.transform = transform;
			return;
		}
		let classes: HashMap<StarId, NodeClass> =
			snapshot.nodes.iter().map(|n| (n.id, n.class)).collect();
		self.graph.visit_nodes_mut(|node| {
			if let Some(class) = classes.get(&node.data.user_data.id) {
				node.data.user_data.class = *class;
			}
		});
		self.edge_styles = snapshot
			.edges
			.iter()
			.map(|e| (e.key, EdgeStyle::from(e)))
			.collect();
		self.current = snapshot.current;
		self.alive = snapshot.alive;
		self.snapshot = snapshot.clone();
	}

	pub fn has_route(&self) -> bool {
		self.snapshot.has_route
	}

	pub fn edge_style(&self, key: &EdgeKey) -> EdgeStyle {
		self.edge_styles.get(key).copied().unwrap_or_default()
	}

	pub fn edge_key(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> Option<EdgeKey> {
		self.edges
			.get(&(a, b))
			.or_else(|| self.edges.get(&(b, a)))
			.copied()
	}

	pub fn position_of(&self, id: StarId) -> Option<(f64, f64)> {
		let idx = *self.index.get(&id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + 2.0 {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<EdgeKey> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut best: Option<(f64, EdgeKey)> = None;
		self.graph.visit_edges(|n1, n2, _| {
			let d = segment_distance(
				(gx, gy),
				(n1.x() as f64, n1.y() as f64),
				(n2.x() as f64, n2.y() as f64),
			);
			if d > EDGE_HIT || best.is_some_and(|(bd, _)| bd <= d) {
				return;
			}
			if let Some(key) = self.edge_key(n1.index(), n2.index()) {
				best = Some((d, key));
			}
		});
		best.map(|(_, key)| key)
	}

	/// Stars win over edges.
	pub fn hit(&self, sx: f64, sy: f64) -> Option<Hit> {
		if let Some(idx) = self.node_at_position(sx, sy) {
			let mut id = None;
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					id = Some(node.data.user_data.id);
				}
			});
			return id.map(Hit::Star);
		}
		self.edge_at_position(sx, sy).map(Hit::Edge)
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in self.edges.keys() {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.flow_time += dt as f64;
		self.settle(dt as f64);

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	// Forces run only while settling; the blend weight reaches 1 at
	// SETTLE_SECS, after which every star sits anchored on its target.
	fn settle(&mut self, dt: f64) {
		if self.settled() {
			return;
		}
		self.graph.update(dt as f32);
		self.settle_t = (self.settle_t + dt).min(SETTLE_SECS);
		let done = self.settled();
		let w = ease_out_cubic(self.settle_t / SETTLE_SECS) as f32;
		self.graph.visit_nodes_mut(|node| {
			let (tx, ty) = node.data.user_data.target;
			if done {
				node.data.x = tx;
				node.data.y = ty;
				node.data.is_anchor = true;
			} else {
				node.data.x += (tx - node.data.x) * w;
				node.data.y += (ty - node.data.y) * w;
			}
		});
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(3)
}

/// Distance from `p` to the segment `a`-`b`.
pub fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	let t = if len2 < f64::EPSILON {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphLink, Viewport, normalize};
	use crate::reconcile::{BlockedEdgeSet, Traversal, classify};
	use crate::test_helpers::sample_graph;

	fn snapshot(route: &[i64]) -> ViewSnapshot {
		let graph = sample_graph();
		let layout = normalize(&graph.nodes, &Viewport::new(900.0, 600.0));
		let route: Vec<StarId> = route.iter().copied().map(StarId).collect();
		let hl = classify(&graph, &route, &Traversal::default());
		ViewSnapshot::build(&graph, &layout, &hl, &BlockedEdgeSet::new(), None, true)
	}

	fn settled(snap: &ViewSnapshot) -> ForceGraphState {
		let mut state = ForceGraphState::new(snap, 900.0, 600.0);
		for _ in 0..80 {
			state.tick(0.016);
		}
		assert!(state.settled());
		state
	}

	#[test]
	fn settles_exactly_on_scaled_positions() {
		let snap = snapshot(&[]);
		let state = settled(&snap);
		for node in &snap.nodes {
			let (x, y) = state.position_of(node.id).unwrap();
			assert!((x - node.x).abs() < 1e-3 && (y - node.y).abs() < 1e-3);
		}
	}

	#[test]
	fn hit_testing_prefers_stars_over_edges() {
		let snap = snapshot(&[]);
		let state = settled(&snap);
		let one = snap.node(StarId(1)).unwrap();
		assert_eq!(state.hit(one.x, one.y), Some(Hit::Star(StarId(1))));

		let three = snap.node(StarId(3)).unwrap();
		let (mx, my) = ((one.x + three.x) / 2.0, (one.y + three.y) / 2.0);
		assert_eq!(
			state.hit(mx, my),
			Some(Hit::Edge(EdgeKey::new(StarId(1), StarId(3))))
		);
		assert_eq!(state.hit(-500.0, -500.0), None);
	}

	#[test]
	fn restyle_keeps_positions() {
		let mut state = settled(&snapshot(&[]));
		let routed = snapshot(&[1, 3, 5]);
		state.apply(&routed);
		assert!(state.settled());
		assert!(state.edge_style(&EdgeKey::new(StarId(3), StarId(5))).on_route);
		assert!(!state.edge_style(&EdgeKey::new(StarId(1), StarId(2))).on_route);
	}

	#[test]
	fn reload_with_new_edges_and_labels_rebuilds() {
		let mut state = settled(&snapshot(&[]));

		let mut graph = sample_graph();
		graph.links.retain(|l| !l.connects(StarId(1), StarId(2)));
		graph.links.push(GraphLink {
			source: StarId(4),
			target: StarId(5),
			distance: 6.0,
		});
		graph.nodes[0].label = "Alpha".into();
		let layout = normalize(&graph.nodes, &Viewport::new(900.0, 600.0));
		let hl = classify(&graph, &[], &Traversal::default());
		let reloaded = ViewSnapshot::build(&graph, &layout, &hl, &BlockedEdgeSet::new(), None, true);
		state.apply(&reloaded);

		let mut drawn = Vec::new();
		state.graph.visit_edges(|a, b, _| {
			drawn.extend(state.edge_key(a.index(), b.index()));
		});
		drawn.sort();
		let mut expected: Vec<EdgeKey> = reloaded.edges.iter().map(|e| e.key).collect();
		expected.sort();
		assert_eq!(drawn, expected);
		assert!(drawn.contains(&EdgeKey::new(StarId(5), StarId(4))));
		assert!(!drawn.contains(&EdgeKey::new(StarId(1), StarId(2))));

		let mut labels = Vec::new();
		state.graph.visit_nodes(|n| labels.push(n.data.user_data.label.clone()));
		assert!(labels.contains(&"Alpha".to_string()));
		assert!(!labels.contains(&"Star One".to_string()));
	}

	#[test]
	fn edge_lookup_ignores_direction() {
		let state = settled(&snapshot(&[]));
		let (Some(&one), Some(&three)) = (state.index.get(&StarId(1)), state.index.get(&StarId(3)))
		else {
			panic!("stars 1 and 3 are drawn");
		};
		let key = EdgeKey::new(StarId(1), StarId(3));
		assert_eq!(state.edge_key(one, three), Some(key));
		assert_eq!(state.edge_key(three, one), Some(key));
	}

	#[test]
	fn segment_distance_clamps_to_endpoints() {
		assert_eq!(segment_distance((5.0, 3.0), (0.0, 0.0), (10.0, 0.0)), 3.0);
		assert_eq!(segment_distance((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
		assert_eq!(segment_distance((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)), 5.0);
	}
}
