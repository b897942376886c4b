//! In-memory stand-in for the simulation server used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::api::*;
use crate::error::{ApiError, ApiResult};
use crate::graph::{BlockedPathEntry, GraphData, GraphLink, GraphNode, StarId};

pub(crate) fn node_at(id: i64, x: f64, y: f64) -> GraphNode {
	GraphNode {
		id: StarId(id),
		label: format!("Star {id}"),
		x,
		y,
		radius: 0.5,
		color: "#3498db".into(),
		hypergiant: false,
		is_shared: false,
		constellations: vec!["Orion".into()],
	}
}

/// Five stars, four edges: 1-2, 1-3, 3-5, 2-4.
pub(crate) fn sample_graph() -> GraphData {
	let names = ["One", "Two", "Three", "Four", "Five"];
	let coords = [(0.0, 0.0), (10.0, 5.0), (4.0, -6.0), (-8.0, 3.0), (12.0, 12.0)];
	let nodes = names
		.iter()
		.zip(coords)
		.enumerate()
		.map(|(i, (name, (x, y)))| {
			let mut node = node_at(i as i64 + 1, x, y);
			node.label = format!("Star {name}");
			node
		})
		.collect();
	let link = |a, b, distance| GraphLink {
		source: StarId(a),
		target: StarId(b),
		distance,
	};
	GraphData {
		nodes,
		links: vec![
			link(1, 2, 1.0),
			link(1, 3, 2.0),
			link(3, 5, 4.0),
			link(2, 4, 3.0),
		],
		constellations: vec!["Orion".into()],
	}
}

pub(crate) fn upload() -> GraphUpload {
	GraphUpload {
		file_name: "constellations.json".into(),
		contents: r#"{"constellations": []}"#.into(),
	}
}

pub(crate) fn route_ok(stars: &[i64]) -> RouteResponse {
	RouteResponse {
		success: true,
		message: None,
		algorithm: Some("Maximize stars visited".into()),
		route: stars.iter().copied().map(StarId).collect(),
		route_labels: Vec::new(),
		statistics: None,
	}
}

fn donkey(star: i64, visited: &[i64], alive: bool) -> DonkeyState {
	DonkeyState {
		current_star_id: StarId(star),
		energy: 60.0,
		health: if alive { Health::Good } else { Health::Dead },
		grass: 100.0,
		age: 10.0,
		death_age: 40.0,
		visited_stars: visited.iter().copied().map(StarId).collect(),
		is_alive: alive,
	}
}

pub(crate) fn step_ok(
	star: i64,
	visited: &[i64],
	alive: bool,
	action: &str,
	is_complete: bool,
) -> NextStepResponse {
	NextStepResponse {
		success: true,
		step: Some(SimulationStep {
			step: visited.len(),
			current_star: StepStar {
				id: StarId(star),
				label: Some(format!("Star {star}")),
				name: None,
				hypergiant: false,
			},
			donkey_state: donkey(star, visited, alive),
			action: action.into(),
			message: format!("{action} at star {star}"),
		}),
		is_complete,
		message: None,
		summary: None,
	}
}

pub(crate) fn step_finished(message: &str) -> NextStepResponse {
	NextStepResponse {
		success: false,
		step: None,
		is_complete: true,
		message: Some(message.into()),
		summary: Some(summary()),
	}
}

fn summary() -> SimulationSummary {
	SimulationSummary {
		total_steps: 2,
		stars_visited: 2,
		final_energy: 40.0,
		final_health: Health::Good,
		remaining_grass: 50.0,
		age: 20.0,
		remaining_life: 20.0,
		is_alive: true,
		route: vec![StarId(1), StarId(3)],
		visited_stars: vec![StarId(1), StarId(3)],
	}
}

pub(crate) struct FakeApi {
	graph: GraphData,
	calls: RefCell<Vec<&'static str>>,
	blocked: RefCell<Vec<BlockedPathEntry>>,
	routes: RefCell<VecDeque<ApiResult<RouteResponse>>>,
	steps: RefCell<VecDeque<ApiResult<NextStepResponse>>>,
	route_requests: RefCell<Vec<RouteRequest>>,
	upload_error: RefCell<Option<ApiError>>,
	fail_blocked_fetch: Cell<bool>,
}

impl FakeApi {
	pub(crate) fn new(graph: GraphData) -> Self {
		Self {
			graph,
			calls: RefCell::new(Vec::new()),
			blocked: RefCell::new(Vec::new()),
			routes: RefCell::new(VecDeque::new()),
			steps: RefCell::new(VecDeque::new()),
			route_requests: RefCell::new(Vec::new()),
			upload_error: RefCell::new(None),
			fail_blocked_fetch: Cell::new(false),
		}
	}

	pub(crate) fn calls(&self) -> Vec<&'static str> {
		self.calls.borrow().clone()
	}

	pub(crate) fn route_requests(&self) -> Vec<RouteRequest> {
		self.route_requests.borrow().clone()
	}

	pub(crate) fn seed_blocked(&self, entries: impl IntoIterator<Item = BlockedPathEntry>) {
		self.blocked.borrow_mut().extend(entries);
	}

	pub(crate) fn fail_blocked_fetch(&self, fail: bool) {
		self.fail_blocked_fetch.set(fail);
	}

	pub(crate) fn fail_upload(&self, err: ApiError) {
		*self.upload_error.borrow_mut() = Some(err);
	}

	pub(crate) fn push_route(&self, response: ApiResult<RouteResponse>) {
		self.routes.borrow_mut().push_back(response);
	}

	pub(crate) fn push_step(&self, response: ApiResult<NextStepResponse>) {
		self.steps.borrow_mut().push_back(response);
	}

	fn record(&self, call: &'static str) {
		self.calls.borrow_mut().push(call);
	}
}

impl StarApi for FakeApi {
	async fn upload_graph(&self, _upload: &GraphUpload) -> ApiResult<UploadResponse> {
		self.record("upload_graph");
		if let Some(err) = self.upload_error.borrow_mut().take() {
			return Err(err);
		}
		Ok(UploadResponse {
			success: true,
			message: Some("File loaded".into()),
			graph_data: Some(self.graph.clone()),
			donkey_initial_state: Some(DonkeyVitals {
				energy: 100.0,
				health: Health::Excellent,
				grass: 300.0,
				age: 5.0,
				death_age: 40.0,
			}),
			statistics: GraphStatistics {
				total_constellations: 1,
				total_stars: self.graph.nodes.len(),
				total_connections: self.graph.links.len(),
				hypergiant_stars: 0,
				constellations_info: Vec::new(),
			},
		})
	}

	async fn calculate_route(&self, request: &RouteRequest) -> ApiResult<RouteResponse> {
		self.record("calculate_route");
		self.route_requests.borrow_mut().push(request.clone());
		self.routes
			.borrow_mut()
			.pop_front()
			.unwrap_or_else(|| Ok(route_ok(&[request.origin_star_id.0])))
	}

	async fn start_simulation(
		&self,
		_request: &StartSimulationRequest,
	) -> ApiResult<StartSimulationResponse> {
		self.record("start_simulation");
		Ok(StartSimulationResponse {
			success: true,
			message: Some("Simulation started".into()),
			total_steps: None,
		})
	}

	async fn next_step(&self) -> ApiResult<NextStepResponse> {
		self.record("next_step");
		self.steps
			.borrow_mut()
			.pop_front()
			.unwrap_or_else(|| Ok(step_finished("The simulation has ended")))
	}

	async fn simulation_summary(&self) -> ApiResult<SimulationSummary> {
		self.record("simulation_summary");
		Ok(summary())
	}

	async fn block_path(&self, request: &BlockPathRequest) -> ApiResult<AckResponse> {
		self.record("block_path");
		let (a, b) = (request.from_star_id, request.to_star_id);
		if self.graph.edge_between(a, b).is_none() {
			return Ok(AckResponse {
				success: false,
				message: Some(format!("Path {a}-{b} does not exist")),
			});
		}
		let mut blocked = self.blocked.borrow_mut();
		blocked.retain(|e| !((e.from == a && e.to == b) || (e.from == b && e.to == a)));
		if request.block {
			blocked.push(BlockedPathEntry::new(a, b, request.reason.clone()));
		}
		let verb = if request.block { "blocked" } else { "unblocked" };
		Ok(AckResponse {
			success: true,
			message: Some(format!("Path {a}-{b} {verb}")),
		})
	}

	async fn blocked_paths(&self) -> ApiResult<Vec<BlockedPathEntry>> {
		self.record("blocked_paths");
		if self.fail_blocked_fetch.get() {
			return Err(ApiError::Transport("connection refused".into()));
		}
		Ok(self.blocked.borrow().clone())
	}

	async fn update_star_effects(&self, update: &StarEffectsUpdate) -> ApiResult<AckResponse> {
		self.record("update_star_effects");
		Ok(AckResponse {
			success: true,
			message: Some(format!("Effects of star {} updated", update.star_id)),
		})
	}
}
