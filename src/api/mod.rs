//! Contract with the remote simulation server.
//!
//! Pathfinding, the donkey simulation and blocked-path persistence all live
//! server-side. The client only sees them through [`StarApi`]; the browser
//! build talks HTTP via [`HttpStarApi`].

mod http;
mod types;

pub use http::HttpStarApi;
pub use types::*;

use crate::error::ApiResult;
use crate::graph::BlockedPathEntry;

/// Endpoints consumed by the session. Every call is a suspend point; the
/// browser is single-threaded so no `Send` bound is required.
#[allow(async_fn_in_trait)]
pub trait StarApi {
	/// `POST /api/upload`
	async fn upload_graph(&self, upload: &GraphUpload) -> ApiResult<UploadResponse>;

	/// `POST /api/calculate-route`
	async fn calculate_route(&self, request: &RouteRequest) -> ApiResult<RouteResponse>;

	/// `POST /api/start-simulation`
	async fn start_simulation(
		&self,
		request: &StartSimulationRequest,
	) -> ApiResult<StartSimulationResponse>;

	/// `GET /api/simulation/next`
	async fn next_step(&self) -> ApiResult<NextStepResponse>;

	/// `GET /api/simulation/summary`
	async fn simulation_summary(&self) -> ApiResult<SimulationSummary>;

	/// `POST /api/block-path`
	async fn block_path(&self, request: &BlockPathRequest) -> ApiResult<AckResponse>;

	/// `GET /api/blocked-paths`
	async fn blocked_paths(&self) -> ApiResult<Vec<BlockedPathEntry>>;

	/// `PUT /api/star/update-effects`
	async fn update_star_effects(&self, update: &StarEffectsUpdate) -> ApiResult<AckResponse>;
}
