//! Read-only side panels fed from the session.

use leptos::ev;
use leptos::prelude::*;

use crate::api::{ComputedRoute, DonkeyVitals, EnergyBand, GraphStatistics, SimulationSummary};
use crate::graph::{BlockedPathEntry, format_route};
use crate::reconcile::{EdgeKey, LogEntry};

fn band_class(energy: f64) -> &'static str {
	match EnergyBand::of(energy) {
		EnergyBand::High => "energy-high",
		EnergyBand::Medium => "energy-medium",
		EnergyBand::Low => "energy-low",
		EnergyBand::Critical => "energy-critical",
	}
}

#[component]
fn Stat(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
	view! {
		<div class="stat">
			<span class="stat-label">{label}</span>
			<span class="stat-value">{move || value.get()}</span>
		</div>
	}
}

#[component]
pub fn StatisticsPanel(#[prop(into)] stats: Signal<GraphStatistics>) -> impl IntoView {
	view! {
		<section class="panel">
			<h3>"Graph"</h3>
			<Stat label="Constellations" value=Signal::derive(move || stats.get().total_constellations.to_string()) />
			<Stat label="Stars" value=Signal::derive(move || stats.get().total_stars.to_string()) />
			<Stat label="Connections" value=Signal::derive(move || stats.get().total_connections.to_string()) />
			<Stat label="Hypergiants" value=Signal::derive(move || stats.get().hypergiant_stars.to_string()) />
			<ul class="constellations">
				{move || {
					stats
						.get()
						.constellations_info
						.into_iter()
						.map(|c| {
							view! {
								<li>
									{c.name}
									<span class="muted">
										{format!(" {} stars, {} hypergiants", c.stars_count, c.hypergiants)}
									</span>
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
		</section>
	}
}

#[component]
pub fn VitalsPanel(#[prop(into)] vitals: Signal<Option<DonkeyVitals>>) -> impl IntoView {
	view! {
		<section class="panel">
			<h3>"Donkey"</h3>
			{move || match vitals.get() {
				None => view! { <p class="muted">"Load a graph to see the donkey"</p> }.into_any(),
				Some(v) => {
					let width = format!("width: {:.0}%", v.energy.clamp(0.0, 100.0));
					view! {
						<div class="energy">
							<div class=format!("energy-bar {}", band_class(v.energy)) style=width></div>
						</div>
						<Stat label="Energy" value=format!("{:.1}%", v.energy) />
						<Stat label="Health" value=v.health.label().to_string() />
						<Stat label="Grass" value=format!("{:.2} kg", v.grass) />
						<Stat label="Age" value=format!("{:.2} / {:.2} ly", v.age, v.death_age) />
					}
						.into_any()
				}
			}}
		</section>
	}
}

#[component]
pub fn RoutePanel(#[prop(into)] route: Signal<Option<ComputedRoute>>) -> impl IntoView {
	view! {
		<section class="panel">
			<h3>"Route"</h3>
			{move || match route.get() {
				None => view! { <p class="muted">"No route calculated"</p> }.into_any(),
				Some(r) => {
					let stats = r.statistics.clone();
					view! {
						<p class="route">{format_route(&r.labels)}</p>
						<p class="muted">{r.algorithm.clone()}</p>
						{stats
							.stars_visited
							.map(|n| view! { <Stat label="Stars visited" value=n.to_string() /> })}
						{stats
							.total_distance
							.map(|d| view! { <Stat label="Distance" value=format!("{d:.2}") /> })}
						{stats
							.final_energy
							.map(|e| view! { <Stat label="Final energy" value=format!("{e:.1}%") /> })}
					}
						.into_any()
				}
			}}
		</section>
	}
}

#[component]
pub fn BlockedPathsPanel(
	#[prop(into)] entries: Signal<Vec<(EdgeKey, BlockedPathEntry)>>,
	on_unblock: Callback<EdgeKey>,
) -> impl IntoView {
	view! {
		<section class="panel">
			<h3>"Blocked paths"</h3>
			{move || {
				let entries = entries.get();
				if entries.is_empty() {
					return view! { <p class="muted">"No blocked paths"</p> }.into_any();
				}
				view! {
					<ul class="blocked">
						{entries
							.into_iter()
							.map(|(key, entry)| {
								let unblock = move |_: ev::MouseEvent| on_unblock.run(key);
								view! {
									<li>
										{format!("{} ↔ {}", entry.from, entry.to)}
										<span class="muted">{format!(" {}", entry.reason)}</span>
										<button class="link" on:click=unblock>"Unblock"</button>
									</li>
								}
							})
							.collect_view()}
					</ul>
				}
					.into_any()
			}}
		</section>
	}
}

#[component]
pub fn SimulationLog(#[prop(into)] entries: Signal<Vec<LogEntry>>) -> impl IntoView {
	view! {
		<section class="panel log">
			<h3>"Simulation log"</h3>
			<ol>
				<For
					each=move || entries.get()
					key=|entry| entry.seq
					children=|entry| {
						view! { <li class=entry.kind.css_class()>{entry.message}</li> }
					}
				/>
			</ol>
		</section>
	}
}

#[component]
pub fn SummaryPanel(#[prop(into)] summary: Signal<Option<SimulationSummary>>) -> impl IntoView {
	move || {
		summary.get().map(|s| {
			view! {
				<section class="panel summary">
					<h3>"Trip summary"</h3>
					<Stat label="Stars visited" value=s.stars_visited.to_string() />
					<Stat label="Final energy" value=format!("{:.1}%", s.final_energy) />
					<Stat label="Final health" value=s.final_health.label().to_string() />
					<Stat label="Remaining grass" value=format!("{:.2} kg", s.remaining_grass) />
					<Stat label="Final age" value=format!("{:.2} ly", s.age) />
					<Stat label="Status" value=if s.is_alive { "Alive" } else { "Dead" }.to_string() />
				</section>
			}
		})
	}
}
