use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

use crate::api::{Algorithm, GraphUpload, HttpStarApi, StarApi};
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::panels::{
	BlockedPathsPanel, RoutePanel, SimulationLog, StatisticsPanel, SummaryPanel, VitalsPanel,
};
use crate::components::toast::{Notice, Toast};
use crate::config::AppConfig;
use crate::error::{SessionResult, ValidationError};
use crate::graph::StarId;
use crate::reconcile::{EdgeKey, Session, Transition};

/// Everything the page can ask the session to do.
#[derive(Clone, Debug, PartialEq)]
enum Action {
	Load(GraphUpload),
	Route {
		origin: String,
		algorithm: Algorithm,
		destination: String,
	},
	Start,
	Step,
	Reset,
	ToggleEdge(EdgeKey),
	RefreshBlocked,
	Effects {
		star: String,
		gained: String,
		lost: String,
	},
}

impl Action {
	async fn apply<A: StarApi>(self, session: &mut Session, api: &A) -> SessionResult<Transition> {
		match self {
			Self::Load(upload) => session.load(api, upload).await,
			Self::Route {
				origin,
				algorithm,
				destination,
			} => {
				session
					.compute_route(api, &origin, algorithm, &destination)
					.await
			}
			Self::Start => session.start_simulation(api).await,
			Self::Step => session.next_step(api).await,
			Self::Reset => session.reset(),
			Self::ToggleEdge(key) => session.toggle_edge(api, key).await,
			Self::RefreshBlocked => session.refresh_blocked(api).await,
			Self::Effects { star, gained, lost } => {
				session
					.update_star_effects(api, &star, &gained, &lost)
					.await
			}
		}
	}
}

/// Runs one action at a time against the page's session.
#[derive(Clone, Copy)]
struct Controller {
	session: RwSignal<Session>,
	busy: RwSignal<bool>,
	notice: RwSignal<Option<Notice>>,
	api: StoredValue<HttpStarApi>,
}

impl Controller {
	fn dispatch(self, action: Action) {
		if self.busy.get_untracked() {
			debug!("busy, action dropped");
			return;
		}
		self.busy.set(true);
		let api = self.api.get_value();
		let mut session = self.session.get_untracked();
		spawn_local(async move {
			let result = action.apply(&mut session, &api).await;
			self.session.set(session);
			if let Some(notice) = Notice::from_result(&result) {
				self.notice.set(Some(notice));
			}
			self.busy.set(false);
		});
	}

	fn fail(self, err: impl ToString) {
		self.notice.set(Some(Notice::error(err)));
	}
}

async fn read_upload(input: &HtmlInputElement) -> Result<GraphUpload, String> {
	let file = input
		.files()
		.and_then(|files| files.item(0))
		.ok_or_else(|| ValidationError::MissingFile.to_string())?;
	let text = JsFuture::from(file.text())
		.await
		.map_err(|e| format!("Could not read {}: {e:?}", file.name()))?;
	Ok(GraphUpload {
		file_name: file.name(),
		contents: text.as_string().unwrap_or_default(),
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = use_context::<AppConfig>().unwrap_or_default();
	let ctl = Controller {
		session: RwSignal::new(Session::new(config.viewport())),
		busy: RwSignal::new(false),
		notice: RwSignal::new(None),
		api: StoredValue::new(HttpStarApi::new(config.api_base.clone())),
	};
	let session = ctl.session;
	let busy = ctl.busy;

	let origin = RwSignal::new(String::new());
	let destination = RwSignal::new(String::new());
	let algorithm = RwSignal::new(Algorithm::default());
	let effect_star = RwSignal::new(String::new());
	let life_gained = RwSignal::new(String::new());
	let life_lost = RwSignal::new(String::new());

	let snapshot = Memo::new(move |_| session.with(|s| s.snapshot()));
	let disabled = move |allowed: fn(&Session) -> bool| {
		move || busy.get() || !session.with(|s| allowed(s))
	};

	let on_file = move |ev: leptos::ev::Event| {
		let Some(input) = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
		else {
			return;
		};
		spawn_local(async move {
			match read_upload(&input).await {
				Ok(upload) => ctl.dispatch(Action::Load(upload)),
				Err(e) => ctl.fail(e),
			}
		});
	};

	let on_route = move |_: leptos::ev::MouseEvent| {
		ctl.dispatch(Action::Route {
			origin: origin.get_untracked(),
			algorithm: algorithm.get_untracked(),
			destination: destination.get_untracked(),
		})
	};
	let on_effects = move |_: leptos::ev::MouseEvent| {
		ctl.dispatch(Action::Effects {
			star: effect_star.get_untracked(),
			gained: life_gained.get_untracked(),
			lost: life_lost.get_untracked(),
		})
	};

	let on_star_click = Callback::new(move |id: StarId| origin.set(id.to_string()));
	let on_edge_click = Callback::new(move |key: EdgeKey| ctl.dispatch(Action::ToggleEdge(key)));
	let on_dismiss = Callback::new(move |_: ()| ctl.notice.set(None));

	view! {
		<div class="app">
			<aside class="sidebar">
				<h1>"Star Route"</h1>

				<section class="panel">
					<h3>"Graph file"</h3>
					<input type="file" accept=".json" on:change=on_file prop:disabled=move || busy.get() />
				</section>

				<section class="panel">
					<h3>"Route"</h3>
					<label>
						"Origin star"
						<input
							type="text"
							placeholder="Click a star or type its ID"
							prop:value=move || origin.get()
							on:input=move |ev| origin.set(event_target_value(&ev))
						/>
					</label>
					<label>
						"Algorithm"
						<select on:change=move |ev| {
							algorithm.set(Algorithm::from_value(&event_target_value(&ev)))
						}>
							{Algorithm::ALL
								.into_iter()
								.map(|a| {
									view! {
										<option value=a.as_str() selected=move || algorithm.get() == a>
											{a.title()}
										</option>
									}
								})
								.collect_view()}
						</select>
					</label>
					<label>
						"Destination"
						<input
							type="text"
							placeholder="Optional"
							prop:value=move || destination.get()
							prop:disabled=move || !algorithm.get().accepts_destination()
							on:input=move |ev| destination.set(event_target_value(&ev))
						/>
					</label>
					<button on:click=on_route prop:disabled=disabled(Session::can_calculate_route)>
						"Calculate route"
					</button>
				</section>

				<section class="panel controls">
					<h3>"Simulation"</h3>
					<p class="status">
						{move || {
							session
								.with(|s| match s.route() {
									Some(route) => {
										format!(
											"{} ({} / {} stars visited)",
											s.phase().label(),
											s.traversal().visited.len(),
											route.stars.len(),
										)
									}
									None => s.phase().label().to_string(),
								})
						}}
					</p>
					<button
						on:click=move |_| ctl.dispatch(Action::Start)
						prop:disabled=disabled(Session::can_start)
					>
						"Start"
					</button>
					<button
						on:click=move |_| ctl.dispatch(Action::Step)
						prop:disabled=disabled(Session::can_step)
					>
						"Next step"
					</button>
					<button
						on:click=move |_| ctl.dispatch(Action::Reset)
						prop:disabled=disabled(Session::can_reset)
					>
						"Reset"
					</button>
				</section>

				<section class="panel">
					<h3>"Star research"</h3>
					<input
						type="text"
						placeholder="Star ID"
						prop:value=move || effect_star.get()
						on:input=move |ev| effect_star.set(event_target_value(&ev))
					/>
					<input
						type="number"
						min="0"
						placeholder="Life gained"
						prop:value=move || life_gained.get()
						on:input=move |ev| life_gained.set(event_target_value(&ev))
					/>
					<input
						type="number"
						min="0"
						placeholder="Life lost"
						prop:value=move || life_lost.get()
						on:input=move |ev| life_lost.set(event_target_value(&ev))
					/>
					<button on:click=on_effects prop:disabled=disabled(Session::can_edit_effects)>
						"Update effects"
					</button>
				</section>

				<StatisticsPanel stats=Signal::derive(move || session.with(|s| s.statistics().clone())) />
				<VitalsPanel vitals=Signal::derive(move || session.with(|s| s.vitals().cloned())) />
				<RoutePanel route=Signal::derive(move || session.with(|s| s.route().cloned())) />
				<BlockedPathsPanel
					entries=Signal::derive(move || {
						session.with(|s| s.blocked().iter().map(|(k, e)| (*k, e.clone())).collect())
					})
					on_unblock=on_edge_click
				/>
				<button
					class="link"
					on:click=move |_| ctl.dispatch(Action::RefreshBlocked)
					prop:disabled=disabled(Session::can_reset)
				>
					"Refresh blocked paths"
				</button>
			</aside>

			<main class="stage">
				<Toast notice=ctl.notice on_dismiss=on_dismiss />
				<ForceGraphCanvas
					snapshot=snapshot
					on_star_click=on_star_click
					on_edge_click=on_edge_click
					width=Some(config.width)
					height=Some(config.height)
				/>
				<p class="hint">
					"Click a star to use it as origin. Click a path to block or unblock it. Scroll to zoom, drag to pan."
				</p>
				<SummaryPanel summary=Signal::derive(move || session.with(|s| s.summary().cloned())) />
				<SimulationLog entries=Signal::derive(move || session.with(|s| s.log().to_vec())) />
			</main>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::graph::Viewport;
	use crate::reconcile::Phase;
	use crate::test_helpers::{FakeApi, route_ok, sample_graph, step_ok, upload};

	#[test]
	fn actions_drive_the_session_in_order() {
		let api = FakeApi::new(sample_graph());
		api.push_route(Ok(route_ok(&[1, 3])));
		api.push_step(Ok(step_ok(1, &[1], true, "travel", false)));
		let mut session = Session::new(Viewport::new(900.0, 600.0));

		let script = [
			Action::Load(upload()),
			Action::Route {
				origin: "1".into(),
				algorithm: Algorithm::MaximizeStars,
				destination: String::new(),
			},
			Action::Start,
			Action::Step,
		];
		for action in script {
			let result = block_on(action.apply(&mut session, &api)).unwrap();
			assert!(matches!(result, Transition::Applied(_)), "{result:?}");
		}
		assert_eq!(session.phase(), Phase::SimulationRunning);
		assert_eq!(session.traversal().current, Some(StarId(1)));

		let key = EdgeKey::new(StarId(1), StarId(2));
		block_on(Action::ToggleEdge(key).apply(&mut session, &api)).unwrap();
		assert!(session.blocked().contains(&key));

		block_on(Action::Reset.apply(&mut session, &api)).unwrap();
		assert_eq!(session.phase(), Phase::Loaded);
	}
}
