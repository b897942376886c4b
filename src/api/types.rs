use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::graph::{BlockedPathEntry, GraphData, StarId};

/// Raw graph file selected by the user.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphUpload {
	pub file_name: String,
	pub contents: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Health {
	#[serde(rename = "Excelente")]
	Excellent,
	#[default]
	#[serde(rename = "Buena")]
	Good,
	#[serde(rename = "Mala")]
	Poor,
	#[serde(rename = "Moribundo")]
	Dying,
	#[serde(rename = "Muerto")]
	Dead,
}

impl Health {
	pub fn label(self) -> &'static str {
		match self {
			Self::Excellent => "Excellent",
			Self::Good => "Good",
			Self::Poor => "Poor",
			Self::Dying => "Dying",
			Self::Dead => "Dead",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyBand {
	High,
	Medium,
	Low,
	Critical,
}

impl EnergyBand {
	pub fn of(energy: f64) -> Self {
		if energy >= 75.0 {
			Self::High
		} else if energy >= 50.0 {
			Self::Medium
		} else if energy >= 25.0 {
			Self::Low
		} else {
			Self::Critical
		}
	}
}

/// The donkey's starting condition as declared in the uploaded file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DonkeyVitals {
	pub energy: f64,
	pub health: Health,
	pub grass: f64,
	pub age: f64,
	pub death_age: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DonkeyState {
	pub current_star_id: StarId,
	pub energy: f64,
	pub health: Health,
	pub grass: f64,
	pub age: f64,
	pub death_age: f64,
	#[serde(default)]
	pub visited_stars: Vec<StarId>,
	#[serde(default = "alive")]
	pub is_alive: bool,
}

fn alive() -> bool {
	true
}

impl DonkeyState {
	pub fn vitals(&self) -> DonkeyVitals {
		DonkeyVitals {
			energy: self.energy,
			health: self.health,
			grass: self.grass,
			age: self.age,
			death_age: self.death_age,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstellationInfo {
	pub name: String,
	pub stars_count: usize,
	pub hypergiants: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
	pub total_constellations: usize,
	pub total_stars: usize,
	pub total_connections: usize,
	pub hypergiant_stars: usize,
	#[serde(default)]
	pub constellations_info: Vec<ConstellationInfo>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UploadResponse {
	pub success: bool,
	#[serde(default)]
	pub message: Option<String>,
	pub graph_data: Option<GraphData>,
	pub donkey_initial_state: Option<DonkeyVitals>,
	#[serde(default)]
	pub statistics: GraphStatistics,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
	#[default]
	MaximizeStars,
	MinimizeCost,
}

impl Algorithm {
	pub const ALL: [Algorithm; 2] = [Algorithm::MaximizeStars, Algorithm::MinimizeCost];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::MaximizeStars => "maximize_stars",
			Self::MinimizeCost => "minimize_cost",
		}
	}

	pub fn from_value(value: &str) -> Self {
		match value {
			"minimize_cost" => Self::MinimizeCost,
			_ => Self::MaximizeStars,
		}
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::MaximizeStars => "Maximize stars visited",
			Self::MinimizeCost => "Minimize cost",
		}
	}

	/// Only the cost minimiser accepts an explicit destination.
	pub fn accepts_destination(self) -> bool {
		matches!(self, Self::MinimizeCost)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteRequest {
	pub origin_star_id: StarId,
	pub algorithm: Algorithm,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub destination_star_id: Option<StarId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStatistics {
	pub stars_visited: Option<usize>,
	pub total_distance: Option<f64>,
	pub final_energy: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RouteResponse {
	pub success: bool,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub algorithm: Option<String>,
	#[serde(default)]
	pub route: Vec<StarId>,
	#[serde(default)]
	pub route_labels: Vec<String>,
	#[serde(default)]
	pub statistics: Option<RouteStatistics>,
}

/// A route the server confirmed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComputedRoute {
	pub origin: StarId,
	pub stars: Vec<StarId>,
	pub labels: Vec<String>,
	pub algorithm: String,
	pub statistics: RouteStatistics,
}

impl RouteResponse {
	pub fn into_route(self, origin: StarId) -> ApiResult<ComputedRoute> {
		if !self.success {
			return Err(ApiError::Rejected(
				self.message
					.unwrap_or_else(|| "Could not calculate a viable route".into()),
			));
		}
		Ok(ComputedRoute {
			origin,
			stars: self.route,
			labels: self.route_labels,
			algorithm: self.algorithm.unwrap_or_default(),
			statistics: self.statistics.unwrap_or_default(),
		})
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StartSimulationRequest {
	pub origin_star_id: StarId,
	pub route: Vec<StarId>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StartSimulationResponse {
	pub success: bool,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub total_steps: Option<usize>,
}

/// The star the donkey stands on after a step. Only the fields the client
/// displays are kept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepStar {
	pub id: StarId,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub hypergiant: bool,
}

impl StepStar {
	pub fn display_name(&self) -> String {
		self.label
			.clone()
			.or_else(|| self.name.clone())
			.unwrap_or_else(|| format!("Star {}", self.id))
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SimulationStep {
	#[serde(default)]
	pub step: usize,
	pub current_star: StepStar,
	pub donkey_state: DonkeyState,
	pub action: String,
	pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SimulationSummary {
	#[serde(default)]
	pub total_steps: usize,
	pub stars_visited: usize,
	pub final_energy: f64,
	pub final_health: Health,
	pub remaining_grass: f64,
	pub age: f64,
	#[serde(default)]
	pub remaining_life: f64,
	pub is_alive: bool,
	#[serde(default)]
	pub route: Vec<StarId>,
	#[serde(default)]
	pub visited_stars: Vec<StarId>,
}

impl SimulationSummary {
	pub fn describe(&self) -> String {
		format!(
			"TRIP SUMMARY: stars visited {}, final energy {:.1}%, final health {}, \
			 remaining grass {:.2} kg, final age {:.2} light-years, status {}",
			self.stars_visited,
			self.final_energy,
			self.final_health.label(),
			self.remaining_grass,
			self.age,
			if self.is_alive { "alive" } else { "dead" },
		)
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NextStepResponse {
	pub success: bool,
	#[serde(default)]
	pub step: Option<SimulationStep>,
	#[serde(default)]
	pub is_complete: bool,
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub summary: Option<SimulationSummary>,
}

/// What a step request produced.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
	Advanced {
		step: Box<SimulationStep>,
		is_complete: bool,
	},
	Finished {
		message: String,
		summary: Option<SimulationSummary>,
	},
}

impl NextStepResponse {
	pub fn into_outcome(self) -> ApiResult<StepOutcome> {
		match (self.success, self.step) {
			(true, Some(step)) => Ok(StepOutcome::Advanced {
				step: Box::new(step),
				is_complete: self.is_complete,
			}),
			(true, None) => Err(ApiError::Decode("step response without a step".into())),
			(false, _) => Ok(StepOutcome::Finished {
				message: self
					.message
					.unwrap_or_else(|| "The simulation has finished".into()),
				summary: self.summary,
			}),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockPathRequest {
	pub from_star_id: StarId,
	pub to_star_id: StarId,
	pub block: bool,
	pub reason: String,
}

pub const BLOCK_REASON: &str = "Comet/meteor crossing";
pub const UNBLOCK_REASON: &str = "Path cleared";

impl BlockPathRequest {
	pub fn new(from: StarId, to: StarId, block: bool) -> Self {
		Self {
			from_star_id: from,
			to_star_id: to,
			block,
			reason: if block { BLOCK_REASON } else { UNBLOCK_REASON }.into(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AckResponse {
	pub success: bool,
	#[serde(default)]
	pub message: Option<String>,
}

impl AckResponse {
	pub fn confirm(self, fallback: &str) -> ApiResult<String> {
		let message = self.message.unwrap_or_else(|| fallback.to_string());
		if self.success {
			Ok(message)
		} else {
			Err(ApiError::Rejected(message))
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BlockedPathsResponse {
	#[serde(default)]
	pub blocked_paths: Vec<BlockedPathEntry>,
}

/// Research effects a scientist may set on a star before the trip.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StarEffectsUpdate {
	pub star_id: StarId,
	pub life_gained: f64,
	pub life_lost: f64,
}

/// Log type a step action maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogKind {
	Info,
	Success,
	Warning,
	Error,
	Special,
}

impl LogKind {
	pub fn for_action(action: &str) -> Self {
		if action.contains("death") {
			Self::Error
		} else if action == "hypergiant_boost" {
			Self::Special
		} else if action == "eat_and_research" {
			Self::Warning
		} else {
			Self::Info
		}
	}

	pub fn css_class(self) -> &'static str {
		match self {
			Self::Info => "log-info",
			Self::Success => "log-success",
			Self::Warning => "log-warning",
			Self::Error => "log-error",
			Self::Special => "log-special",
		}
	}
}
