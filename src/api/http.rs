use gloo_net::http::{Request, Response};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

use super::StarApi;
use super::types::*;
use crate::error::{ApiError, ApiResult};
use crate::graph::BlockedPathEntry;

/// Browser implementation of [`StarApi`] on top of `fetch`.
#[derive(Clone, Debug, Default)]
pub struct HttpStarApi {
	base: String,
}

// FastAPI puts a string (or a list of validation issues) in `detail`.
#[derive(Deserialize)]
struct ErrorBody {
	detail: Option<serde_json::Value>,
}

impl HttpStarApi {
	pub fn new(base: impl Into<String>) -> Self {
		let base = base.into();
		Self {
			base: base.trim_end_matches('/').to_string(),
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base, path)
	}

	async fn send<T: DeserializeOwned>(request: Request, fallback: &str) -> ApiResult<T> {
		debug!("fetch {}", request.url());
		let response = request.send().await.map_err(transport)?;
		decode(response, fallback).await
	}
}

fn transport(err: impl std::fmt::Display) -> ApiError {
	ApiError::Transport(err.to_string())
}

fn js_error(err: JsValue) -> ApiError {
	ApiError::Transport(format!("{err:?}"))
}

async fn decode<T: DeserializeOwned>(response: Response, fallback: &str) -> ApiResult<T> {
	if !response.ok() {
		let status = response.status();
		let detail = match response.json::<ErrorBody>().await {
			Ok(ErrorBody {
				detail: Some(serde_json::Value::String(s)),
			}) => s,
			Ok(ErrorBody {
				detail: Some(other),
			}) => other.to_string(),
			_ => fallback.to_string(),
		};
		return Err(ApiError::Status { status, detail });
	}
	response
		.json::<T>()
		.await
		.map_err(|e| ApiError::Decode(e.to_string()))
}

impl StarApi for HttpStarApi {
	async fn upload_graph(&self, upload: &GraphUpload) -> ApiResult<UploadResponse> {
		let parts = js_sys::Array::of1(&JsValue::from_str(&upload.contents));
		let blob = Blob::new_with_str_sequence(&parts).map_err(js_error)?;
		let form = FormData::new().map_err(js_error)?;
		form.append_with_blob_and_filename("file", &blob, &upload.file_name)
			.map_err(js_error)?;
		let request = Request::post(&self.url("/api/upload"))
			.body(form)
			.map_err(transport)?;
		Self::send(request, "Failed to load file").await
	}

	async fn calculate_route(&self, request: &RouteRequest) -> ApiResult<RouteResponse> {
		let request = Request::post(&self.url("/api/calculate-route"))
			.json(request)
			.map_err(transport)?;
		Self::send(request, "Failed to calculate route").await
	}

	async fn start_simulation(
		&self,
		request: &StartSimulationRequest,
	) -> ApiResult<StartSimulationResponse> {
		let request = Request::post(&self.url("/api/start-simulation"))
			.json(request)
			.map_err(transport)?;
		Self::send(request, "Failed to start simulation").await
	}

	async fn next_step(&self) -> ApiResult<NextStepResponse> {
		let request = Request::get(&self.url("/api/simulation/next"))
			.build()
			.map_err(transport)?;
		Self::send(request, "Failed to fetch next step").await
	}

	async fn simulation_summary(&self) -> ApiResult<SimulationSummary> {
		let request = Request::get(&self.url("/api/simulation/summary"))
			.build()
			.map_err(transport)?;
		Self::send(request, "Failed to fetch simulation summary").await
	}

	async fn block_path(&self, request: &BlockPathRequest) -> ApiResult<AckResponse> {
		let request = Request::post(&self.url("/api/block-path"))
			.json(request)
			.map_err(transport)?;
		Self::send(request, "Failed to modify path").await
	}

	async fn blocked_paths(&self) -> ApiResult<Vec<BlockedPathEntry>> {
		let request = Request::get(&self.url("/api/blocked-paths"))
			.build()
			.map_err(transport)?;
		let body: BlockedPathsResponse =
			Self::send(request, "Failed to load blocked paths").await?;
		Ok(body.blocked_paths)
	}

	async fn update_star_effects(&self, update: &StarEffectsUpdate) -> ApiResult<AckResponse> {
		let url = format!(
			"{}?star_id={}&life_gained={}&life_lost={}",
			self.url("/api/star/update-effects"),
			update.star_id,
			update.life_gained,
			update.life_lost,
		);
		let request = Request::put(&url).build().map_err(transport)?;
		Self::send(request, "Failed to update star effects").await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base_url_is_trimmed() {
		let api = HttpStarApi::new("http://localhost:8000/");
		assert_eq!(api.url("/api/upload"), "http://localhost:8000/api/upload");
		assert_eq!(HttpStarApi::default().url("/api/upload"), "/api/upload");
	}
}
