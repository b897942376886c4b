use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, ValidationError};

/// Stable star identifier as issued by the server.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StarId(pub i64);

impl fmt::Display for StarId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for StarId {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		trimmed
			.parse::<i64>()
			.map(StarId)
			.map_err(|_| ValidationError::InvalidStarId(trimmed.to_string()))
	}
}

/// A star as delivered by the graph ingestion endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: StarId,
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	#[serde(default = "default_color")]
	pub color: String,
	#[serde(default)]
	pub hypergiant: bool,
	#[serde(default, rename = "isShared")]
	pub is_shared: bool,
	#[serde(default)]
	pub constellations: Vec<String>,
}

impl GraphNode {
	/// Flagged shared by the server, or a member of more than one constellation.
	pub fn shared(&self) -> bool {
		self.is_shared || self.constellations.len() > 1
	}
}

fn default_color() -> String {
	"#888".into()
}

/// Undirected connection. `source`/`target` order carries no meaning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	pub source: StarId,
	pub target: StarId,
	pub distance: f64,
}

impl GraphLink {
	pub fn connects(&self, a: StarId, b: StarId) -> bool {
		(self.source == a && self.target == b) || (self.source == b && self.target == a)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(rename = "edges", alias = "links")]
	pub links: Vec<GraphLink>,
	#[serde(default)]
	pub constellations: Vec<String>,
}

impl GraphData {
	/// Checks identifier uniqueness and referential integrity of every edge.
	pub fn validate(&self) -> Result<(), GraphError> {
		let mut seen = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !seen.insert(node.id) {
				return Err(GraphError::DuplicateStar(node.id));
			}
			if node.constellations.is_empty() {
				return Err(GraphError::NoConstellation(node.id));
			}
		}
		for link in &self.links {
			if !seen.contains(&link.source) || !seen.contains(&link.target) {
				return Err(GraphError::DanglingEdge {
					from: link.source,
					to: link.target,
				});
			}
			if link.distance < 0.0 || link.distance.is_nan() {
				return Err(GraphError::NegativeDistance {
					from: link.source,
					to: link.target,
					distance: link.distance,
				});
			}
		}
		Ok(())
	}

	pub fn node(&self, id: StarId) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn contains(&self, id: StarId) -> bool {
		self.node(id).is_some()
	}

	pub fn label_of(&self, id: StarId) -> String {
		self.node(id)
			.map(|n| n.label.clone())
			.unwrap_or_else(|| format!("Star {id}"))
	}

	/// First edge between `a` and `b` in either direction.
	pub fn edge_between(&self, a: StarId, b: StarId) -> Option<&GraphLink> {
		self.links.iter().find(|l| l.connects(a, b))
	}

	/// Sum of consecutive hop distances. Hops without a matching edge add nothing.
	pub fn route_distance(&self, route: &[StarId]) -> f64 {
		route
			.windows(2)
			.filter_map(|hop| self.edge_between(hop[0], hop[1]))
			.map(|l| l.distance)
			.sum()
	}

	pub fn route_labels(&self, route: &[StarId]) -> Vec<String> {
		route.iter().map(|&id| self.label_of(id)).collect()
	}
}

pub fn format_route(labels: &[String]) -> String {
	if labels.is_empty() {
		return "No route found".into();
	}
	labels.join(" → ")
}

/// A blocked path as reported by the server; endpoints are unordered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockedPathEntry {
	#[serde(rename = "from_star_id")]
	pub from: StarId,
	#[serde(rename = "to_star_id")]
	pub to: StarId,
	#[serde(default)]
	pub reason: String,
	/// Server-rendered display text such as "Vega ↔ Altair".
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
}

#[cfg(test)]
impl BlockedPathEntry {
	pub fn new(from: StarId, to: StarId, reason: impl Into<String>) -> Self {
		Self {
			from,
			to,
			reason: reason.into(),
			path: None,
		}
	}
}
