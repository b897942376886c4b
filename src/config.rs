use log::debug;

use crate::graph::Viewport;

/// Meta tag carrying the API base URL, e.g.
/// `<meta name="star-route-api" content="http://localhost:8000">`.
pub const API_META: &str = "star-route-api";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Empty means same-origin.
	pub api_base: String,
	pub width: f64,
	pub height: f64,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base: String::new(),
			width: 900.0,
			height: 600.0,
		}
	}
}

impl AppConfig {
	pub fn with_api_base(mut self, base: &str) -> Self {
		self.api_base = base.trim().trim_end_matches('/').to_string();
		self
	}

	pub fn viewport(&self) -> Viewport {
		Viewport::new(self.width, self.height)
	}

	/// Reads overrides from the host page. Anything missing keeps its default.
	pub fn from_document() -> Self {
		let config = Self::default();
		let base = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| {
				d.query_selector(&format!("meta[name=\"{API_META}\"]"))
					.ok()
					.flatten()
			})
			.and_then(|meta| meta.get_attribute("content"));
		match base {
			Some(base) => {
				debug!("api base from page: {base}");
				config.with_api_base(&base)
			}
			None => config,
		}
	}
}
