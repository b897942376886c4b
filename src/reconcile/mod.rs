//! View-state reconciliation: derives what to draw from the loaded graph,
//! the server-reported blocked paths and the simulation progress.

mod blocked;
mod highlight;
mod session;
mod snapshot;

pub use blocked::EdgeKey;
pub use highlight::NodeClass;
pub use session::{LogEntry, Phase, Session, Transition};
pub use snapshot::{EdgeView, ViewSnapshot};

#[cfg(test)]
pub(crate) use {
	blocked::BlockedEdgeSet,
	highlight::{Traversal, classify},
};

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::api::Algorithm;
	use crate::graph::{StarId, Viewport};
	use crate::test_helpers::{FakeApi, route_ok, sample_graph, step_ok, upload};

	fn key(a: i64, b: i64) -> EdgeKey {
		EdgeKey::new(StarId(a), StarId(b))
	}

	#[test]
	fn load_block_route_walk_and_reset() {
		let api = FakeApi::new(sample_graph());
		api.push_route(Ok(route_ok(&[1, 3, 5])));
		api.push_step(Ok(step_ok(1, &[1], true, "travel", false)));
		api.push_step(Ok(step_ok(3, &[1, 3], true, "eat_and_research", false)));
		api.push_step(Ok(step_ok(5, &[1, 3, 5], true, "travel", true)));
		let mut session = Session::new(Viewport::new(900.0, 600.0));

		block_on(session.load(&api, upload())).unwrap();
		assert_eq!(session.phase(), Phase::Loaded);
		for node in &session.snapshot().unwrap().nodes {
			assert!((50.0..=850.0).contains(&node.x) && (50.0..=550.0).contains(&node.y));
		}

		// the blocked set round-trips through the server
		block_on(session.toggle_edge(&api, key(2, 4))).unwrap();
		assert!(session.snapshot().unwrap().edge(key(4, 2)).unwrap().blocked);

		let routed =
			block_on(session.compute_route(&api, "1", Algorithm::MaximizeStars, "")).unwrap();
		assert_eq!(
			routed,
			Transition::Applied("Route calculated: Star One → Star Three → Star Five".into())
		);
		let snap = session.snapshot().unwrap();
		let mut on_route: Vec<EdgeKey> =
			snap.edges.iter().filter(|e| e.on_route).map(|e| e.key).collect();
		on_route.sort();
		assert_eq!(on_route, vec![key(1, 3), key(3, 5)]);
		for id in [2, 4] {
			assert!(!snap.node(StarId(id)).unwrap().class.on_route);
		}

		block_on(session.start_simulation(&api)).unwrap();
		let mut currents = Vec::new();
		while session.phase() == Phase::SimulationRunning {
			block_on(session.next_step(&api)).unwrap();
			currents.push(session.traversal().current);
		}
		assert_eq!(currents, vec![Some(StarId(1)), Some(StarId(3)), Some(StarId(5))]);
		assert_eq!(session.phase(), Phase::SimulationComplete);
		assert!(session.summary().is_some());

		let snap = session.snapshot().unwrap();
		assert!(snap.node(StarId(5)).unwrap().class.is_current);
		assert!(snap.node(StarId(1)).unwrap().class.is_visited);
		assert!(snap.edge(key(2, 4)).unwrap().blocked);

		session.reset().unwrap();
		assert_eq!(session.phase(), Phase::Loaded);
		let snap = session.snapshot().unwrap();
		assert!(!snap.has_route);
		assert!(snap.current.is_none());
		assert!(snap.edge(key(2, 4)).unwrap().blocked);

		assert_eq!(
			api.calls(),
			vec![
				"upload_graph",
				"blocked_paths",
				"block_path",
				"blocked_paths",
				"calculate_route",
				"start_simulation",
				"next_step",
				"next_step",
				"next_step",
				"simulation_summary",
			]
		);
	}
}
