//! Session state machine driving the remote simulation.
//!
//! All mutable client state lives in one [`Session`] value. Every action
//! borrows it mutably for the whole request, so two transitions can never
//! be in flight for the same session, and a failed request returns before
//! anything is committed.

use log::{debug, info, warn};

use super::blocked::{BlockedEdgeSet, EdgeKey};
use super::highlight::{RouteHighlight, Traversal, classify};
use super::snapshot::ViewSnapshot;
use crate::api::{
	Algorithm, ComputedRoute, DonkeyVitals, GraphStatistics, GraphUpload, LogKind, RouteRequest,
	SimulationSummary, StarApi, StarEffectsUpdate, StartSimulationRequest, StepOutcome,
};
use crate::error::{ApiError, SessionResult, StateError, ValidationError};
use crate::graph::{GraphData, ScaledLayout, StarId, Viewport, format_route, normalize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
	#[default]
	Empty,
	Loaded,
	RouteComputed,
	SimulationRunning,
	SimulationComplete,
}

impl Phase {
	pub fn label(self) -> &'static str {
		match self {
			Self::Empty => "No graph loaded",
			Self::Loaded => "Graph loaded",
			Self::RouteComputed => "Route ready",
			Self::SimulationRunning => "Simulation running",
			Self::SimulationComplete => "Simulation complete",
		}
	}
}

/// Result of an action that did not fail.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
	/// State changed; carries the text to show the user.
	Applied(String),
	/// Action not valid in the current phase; nothing changed.
	Ignored(StateError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
	pub seq: u64,
	pub kind: LogKind,
	pub message: String,
}

#[derive(Clone, Debug)]
pub struct Session {
	phase: Phase,
	viewport: Viewport,
	graph: Option<GraphData>,
	layout: ScaledLayout,
	statistics: GraphStatistics,
	initial_vitals: Option<DonkeyVitals>,
	vitals: Option<DonkeyVitals>,
	route: Option<ComputedRoute>,
	traversal: Traversal,
	blocked: BlockedEdgeSet,
	summary: Option<SimulationSummary>,
	log: Vec<LogEntry>,
	next_seq: u64,
}

impl Session {
	pub fn new(viewport: Viewport) -> Self {
		Self {
			phase: Phase::Empty,
			viewport,
			graph: None,
			layout: ScaledLayout::default(),
			statistics: GraphStatistics::default(),
			initial_vitals: None,
			vitals: None,
			route: None,
			traversal: Traversal::default(),
			blocked: BlockedEdgeSet::new(),
			summary: None,
			log: Vec::new(),
			next_seq: 0,
		}
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn statistics(&self) -> &GraphStatistics {
		&self.statistics
	}

	pub fn vitals(&self) -> Option<&DonkeyVitals> {
		self.vitals.as_ref()
	}

	pub fn route(&self) -> Option<&ComputedRoute> {
		self.route.as_ref()
	}

	pub fn traversal(&self) -> &Traversal {
		&self.traversal
	}

	pub fn blocked(&self) -> &BlockedEdgeSet {
		&self.blocked
	}

	pub fn summary(&self) -> Option<&SimulationSummary> {
		self.summary.as_ref()
	}

	pub fn log(&self) -> &[LogEntry] {
		&self.log
	}

	pub fn can_calculate_route(&self) -> bool {
		self.graph.is_some() && self.phase != Phase::SimulationRunning
	}

	pub fn can_start(&self) -> bool {
		matches!(
			self.phase,
			Phase::RouteComputed | Phase::SimulationComplete
		)
	}

	pub fn can_step(&self) -> bool {
		self.phase == Phase::SimulationRunning
	}

	pub fn can_edit_effects(&self) -> bool {
		self.graph.is_some() && self.phase != Phase::SimulationRunning
	}

	pub fn can_reset(&self) -> bool {
		self.graph.is_some()
	}

	fn push_log(&mut self, kind: LogKind, message: impl Into<String>) {
		self.log.push(LogEntry {
			seq: self.next_seq,
			kind,
			message: message.into(),
		});
		self.next_seq += 1;
	}

	fn ignored(action: &str, reason: StateError) -> SessionResult<Transition> {
		debug!("{action} ignored: {reason}");
		Ok(Transition::Ignored(reason))
	}

	/// Uploads a graph file and, once the server accepts it, replaces all
	/// session state. The initial blocked-path list is fetched right after.
	pub async fn load<A: StarApi>(
		&mut self,
		api: &A,
		upload: GraphUpload,
	) -> SessionResult<Transition> {
		if upload.contents.trim().is_empty() {
			return Err(ValidationError::EmptyFile.into());
		}
		let response = api.upload_graph(&upload).await?;
		if !response.success {
			return Err(ApiError::Rejected(
				response
					.message
					.unwrap_or_else(|| "Failed to load file".into()),
			)
			.into());
		}
		let graph = response
			.graph_data
			.ok_or_else(|| ApiError::Decode("upload response without graph_data".into()))?;
		graph.validate()?;

		let stars = graph.nodes.len();
		self.layout = normalize(&graph.nodes, &self.viewport);
		self.graph = Some(graph);
		self.statistics = response.statistics;
		self.initial_vitals = response.donkey_initial_state;
		self.vitals = self.initial_vitals.clone();
		self.route = None;
		self.traversal = Traversal::default();
		self.blocked.clear();
		self.summary = None;
		self.log.clear();
		self.phase = Phase::Loaded;
		info!("graph loaded from {}: {stars} stars", upload.file_name);

		if let Err(e) = self.blocked.refresh(api).await {
			warn!("could not load blocked paths: {e}");
		}
		Ok(Transition::Applied(format!("File loaded: {stars} stars")))
	}

	/// Parses the user's origin (and destination for cost minimisation)
	/// and asks the server for a route.
	pub async fn compute_route<A: StarApi>(
		&mut self,
		api: &A,
		origin_input: &str,
		algorithm: Algorithm,
		destination_input: &str,
	) -> SessionResult<Transition> {
		let Some(graph) = &self.graph else {
			return Self::ignored("route", StateError::NoGraph);
		};
		if self.phase == Phase::SimulationRunning {
			return Self::ignored("route", StateError::SimulationInProgress);
		}
		let origin: StarId = origin_input.parse()?;
		if !graph.contains(origin) {
			return Err(ValidationError::UnknownStar(origin).into());
		}
		let destination_star_id = if algorithm.accepts_destination() {
			destination_input.parse::<StarId>().ok()
		} else {
			None
		};

		let request = RouteRequest {
			origin_star_id: origin,
			algorithm,
			destination_star_id,
		};
		let mut route = api.calculate_route(&request).await?.into_route(origin)?;
		if route.stars.is_empty() {
			return Err(ApiError::Rejected("Could not calculate a viable route".into()).into());
		}
		if route.labels.len() != route.stars.len() {
			route.labels = graph.route_labels(&route.stars);
		}
		if route.statistics.total_distance.is_none() {
			route.statistics.total_distance = Some(graph.route_distance(&route.stars));
		}

		let notice = format!("Route calculated: {}", format_route(&route.labels));
		info!(
			"{} route from {origin}: {} stars",
			algorithm.as_str(),
			route.stars.len()
		);
		self.route = Some(route);
		self.traversal = Traversal::default();
		self.summary = None;
		self.vitals = self.initial_vitals.clone();
		self.phase = Phase::RouteComputed;
		Ok(Transition::Applied(notice))
	}

	pub async fn start_simulation<A: StarApi>(&mut self, api: &A) -> SessionResult<Transition> {
		match self.phase {
			Phase::RouteComputed | Phase::SimulationComplete => {}
			Phase::SimulationRunning => {
				return Self::ignored("start", StateError::SimulationInProgress);
			}
			Phase::Empty => return Self::ignored("start", StateError::NoGraph),
			Phase::Loaded => return Self::ignored("start", StateError::NoRoute),
		}
		let Some(route) = &self.route else {
			return Self::ignored("start", StateError::NoRoute);
		};

		let request = StartSimulationRequest {
			origin_star_id: route.origin,
			route: route.stars.clone(),
		};
		let response = api.start_simulation(&request).await?;
		if !response.success {
			return Err(ApiError::Rejected(
				response
					.message
					.unwrap_or_else(|| "Failed to start simulation".into()),
			)
			.into());
		}

		self.traversal = Traversal::default();
		self.summary = None;
		self.vitals = self.initial_vitals.clone();
		self.phase = Phase::SimulationRunning;
		self.push_log(LogKind::Info, "Simulation started");
		info!("simulation started over {} stars", request.route.len());
		Ok(Transition::Applied(
			"Simulation started - use Next step to advance".into(),
		))
	}

	/// Requests exactly one step and applies it before returning.
	pub async fn next_step<A: StarApi>(&mut self, api: &A) -> SessionResult<Transition> {
		if self.phase != Phase::SimulationRunning {
			return Self::ignored("next step", StateError::NotRunning);
		}

		match api.next_step().await?.into_outcome()? {
			StepOutcome::Advanced { step, is_complete } => {
				let state = &step.donkey_state;
				self.traversal = Traversal {
					current: Some(step.current_star.id),
					visited: state.visited_stars.clone(),
					alive: state.is_alive,
				};
				self.vitals = Some(state.vitals());
				self.push_log(LogKind::for_action(&step.action), step.message.clone());
				debug!(
					"step {} at {} ({})",
					step.step,
					step.current_star.display_name(),
					step.action
				);

				if !state.is_alive {
					self.push_log(LogKind::Error, "The donkey has died");
				}
				if is_complete || !state.is_alive {
					self.finish(api, None).await;
				}
				Ok(Transition::Applied(step.message))
			}
			StepOutcome::Finished { message, summary } => {
				self.push_log(LogKind::Info, message.clone());
				self.finish(api, summary).await;
				Ok(Transition::Applied(message))
			}
		}
	}

	async fn finish<A: StarApi>(&mut self, api: &A, summary: Option<SimulationSummary>) {
		self.phase = Phase::SimulationComplete;
		self.push_log(LogKind::Success, "Simulation completed");
		let summary = match summary {
			Some(s) => Some(s),
			None => match api.simulation_summary().await {
				Ok(s) => Some(s),
				Err(e) => {
					warn!("could not fetch simulation summary: {e}");
					None
				}
			},
		};
		if let Some(summary) = summary {
			self.push_log(LogKind::Special, summary.describe());
			self.summary = Some(summary);
		}
		info!(
			"simulation finished, donkey {}",
			if self.traversal.alive { "alive" } else { "dead" }
		);
	}

	pub async fn toggle_block<A: StarApi>(
		&mut self,
		api: &A,
		a: StarId,
		b: StarId,
		should_block: bool,
	) -> SessionResult<Transition> {
		if self.graph.is_none() {
			return Self::ignored("block path", StateError::NoGraph);
		}
		let message = self.blocked.toggle(api, a, b, should_block).await?;
		Ok(Transition::Applied(message))
	}

	/// Blocks an open edge or unblocks a blocked one.
	pub async fn toggle_edge<A: StarApi>(
		&mut self,
		api: &A,
		key: EdgeKey,
	) -> SessionResult<Transition> {
		let (a, b) = key.endpoints();
		let should_block = !self.blocked.contains(&key);
		self.toggle_block(api, a, b, should_block).await
	}

	pub async fn refresh_blocked<A: StarApi>(&mut self, api: &A) -> SessionResult<Transition> {
		if self.graph.is_none() {
			return Self::ignored("refresh blocked paths", StateError::NoGraph);
		}
		self.blocked.refresh(api).await?;
		if self.blocked.is_empty() {
			return Ok(Transition::Applied("No blocked paths".into()));
		}
		Ok(Transition::Applied(format!(
			"{} blocked paths",
			self.blocked.len()
		)))
	}

	/// Sets the research effects of a star before a trip.
	pub async fn update_star_effects<A: StarApi>(
		&mut self,
		api: &A,
		star_input: &str,
		life_gained_input: &str,
		life_lost_input: &str,
	) -> SessionResult<Transition> {
		let Some(graph) = &self.graph else {
			return Self::ignored("update effects", StateError::NoGraph);
		};
		if self.phase == Phase::SimulationRunning {
			return Self::ignored("update effects", StateError::SimulationInProgress);
		}
		let star_id: StarId = star_input.parse()?;
		if !graph.contains(star_id) {
			return Err(ValidationError::UnknownStar(star_id).into());
		}
		let update = StarEffectsUpdate {
			star_id,
			life_gained: parse_effect("life gained", life_gained_input)?,
			life_lost: parse_effect("life lost", life_lost_input)?,
		};
		let message = api
			.update_star_effects(&update)
			.await?
			.confirm("Star effects updated")?;
		info!("effects of star {star_id} updated");
		Ok(Transition::Applied(message))
	}

	/// Back to `Loaded` with the same graph. Blocked paths are kept as-is.
	pub fn reset(&mut self) -> SessionResult<Transition> {
		if self.graph.is_none() {
			return Self::ignored("reset", StateError::NoGraph);
		}
		self.route = None;
		self.traversal = Traversal::default();
		self.summary = None;
		self.vitals = self.initial_vitals.clone();
		self.log.clear();
		self.push_log(LogKind::Info, "System reset");
		self.phase = Phase::Loaded;
		info!("session reset");
		Ok(Transition::Applied("Session reset".into()))
	}

	pub fn highlight(&self) -> RouteHighlight {
		let route = self.route.as_ref().map(|r| r.stars.as_slice()).unwrap_or(&[]);
		match &self.graph {
			Some(graph) => classify(graph, route, &self.traversal),
			None => RouteHighlight::default(),
		}
	}

	pub fn snapshot(&self) -> Option<ViewSnapshot> {
		let graph = self.graph.as_ref()?;
		Some(ViewSnapshot::build(
			graph,
			&self.layout,
			&self.highlight(),
			&self.blocked,
			self.traversal.current,
			self.traversal.alive,
		))
	}
}

fn parse_effect(field: &'static str, input: &str) -> Result<f64, ValidationError> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Ok(0.0);
	}
	match trimmed.parse::<f64>() {
		Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
		_ => Err(ValidationError::InvalidEffect {
			field,
			value: trimmed.to_string(),
		}),
	}
}
