//! Maps raw star coordinates into a bounded viewport.

use std::collections::HashMap;

use super::types::{GraphNode, StarId};

/// Inset kept free on every side of the viewport.
pub const VIEWPORT_MARGIN: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub margin: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			margin: VIEWPORT_MARGIN,
		}
	}

	fn x_range(&self) -> (f64, f64) {
		inset(self.width, self.margin)
	}

	fn y_range(&self) -> (f64, f64) {
		inset(self.height, self.margin)
	}
}

// A viewport narrower than both margins collapses to its midpoint.
fn inset(dimension: f64, margin: f64) -> (f64, f64) {
	let lo = margin;
	let hi = dimension - margin;
	if hi < lo {
		let mid = dimension / 2.0;
		(mid, mid)
	} else {
		(lo, hi)
	}
}

/// Linear map from `domain` onto `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl LinearScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	/// Smallest and largest finite value, if any.
	pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
		values
			.into_iter()
			.filter(|v| v.is_finite())
			.fold(None, |acc, v| match acc {
				None => Some((v, v)),
				Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
			})
	}

	pub fn apply(&self, value: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		let span = d1 - d0;
		if span.abs() < f64::EPSILON || !value.is_finite() {
			return (r0 + r1) / 2.0;
		}
		let t = ((value - d0) / span).clamp(0.0, 1.0);
		r0 + t * (r1 - r0)
	}
}

/// Per-star screen positions, fixed for the lifetime of a loaded graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScaledLayout {
	positions: HashMap<StarId, (f64, f64)>,
}

impl ScaledLayout {
	pub fn position(&self, id: StarId) -> Option<(f64, f64)> {
		self.positions.get(&id).copied()
	}
}

/// Scales each axis independently so every star lands in
/// `[margin, dimension - margin]`.
pub fn normalize(nodes: &[GraphNode], viewport: &Viewport) -> ScaledLayout {
	let x_extent = LinearScale::extent(nodes.iter().map(|n| n.x)).unwrap_or((0.0, 0.0));
	let y_extent = LinearScale::extent(nodes.iter().map(|n| n.y)).unwrap_or((0.0, 0.0));
	let x_scale = LinearScale::new(x_extent, viewport.x_range());
	let y_scale = LinearScale::new(y_extent, viewport.y_range());

	let positions = nodes
		.iter()
		.map(|n| (n.id, (x_scale.apply(n.x), y_scale.apply(n.y))))
		.collect();
	ScaledLayout { positions }
}
