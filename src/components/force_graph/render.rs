use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, ease_out_cubic};

const BACKGROUND: &str = "#0f172a";
const EDGE: &str = "74, 85, 104";
const ROUTE: &str = "16, 185, 129";
const BLOCKED: &str = "239, 68, 68";
const HYPERGIANT: &str = "#fbbf24";
const DONKEY: &str = "#22c55e";

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_donkey(state, ctx);
	ctx.restore();
}

/// Background only, shown until a graph is loaded.
pub fn render_empty(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap) = (8.0 / k, 5.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let Some(key) = state.edge_key(n1.index(), n2.index()) else {
			return;
		};
		let style = state.edge_style(&key);
		let hovered = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());

		let (rgb, base_alpha, base_width) = if style.blocked {
			(BLOCKED, 0.9, 2.5)
		} else if style.on_route {
			(ROUTE, 1.0, 4.0)
		} else {
			(EDGE, 0.6, 2.0)
		};
		let alpha = if hovered {
			base_alpha + (1.0 - base_alpha) * t
		} else {
			base_alpha * (1.0 - 0.6 * t)
		};

		ctx.set_stroke_style_str(&format!("rgba({rgb}, {alpha})"));
		ctx.set_line_width(base_width / k);
		if style.blocked {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
		} else if style.on_route {
			// route edges flow in the travel direction
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash * 2.0),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		if hovered && t > 0.01 {
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", 0.8 * t));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(
				&format!("{:.1}", style.distance),
				(x1 + x2) / 2.0 + 4.0 / k,
				(y1 + y2) / 2.0 - 4.0 / k,
			);
		}
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_line_dash_offset(0.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);
	let any_route = state.has_route();

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let lit = has_highlight && state.is_highlighted(idx);
		let hovered = state.is_hovered(idx);

		let mut radius = info.radius;
		if hovered {
			radius *= 1.0 + 0.3 * t;
		}
		let mut alpha = if any_route && !info.class.on_route {
			0.3
		} else {
			0.9
		};
		if has_highlight && !lit {
			alpha *= 1.0 - 0.6 * t;
		}

		if lit && t > 0.01 {
			let glow = radius * (1.6 + 0.8 * t);
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow) {
				let a = if hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {a})"));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();

		let (stroke, width) = if info.class.is_current {
			(DONKEY, 4.0)
		} else if info.class.on_route {
			("#10b981", 4.0)
		} else if info.hypergiant {
			(HYPERGIANT, 4.0)
		} else {
			("#ffffff", 2.0)
		};
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(width / k);
		ctx.stroke();

		if info.class.is_visited {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 4.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(34, 197, 94, 0.6)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
		if info.shared {
			ctx.begin_path();
			let _ = ctx.arc(x + radius * 0.7, y - radius * 0.7, 2.5 / k, 0.0, 2.0 * PI);
			ctx.set_fill_style_str("#ef4444");
			ctx.fill();
		}
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha));
		ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&info.label, x, y - radius - 4.0 / k);

		if hovered && t > 0.01 {
			let detail = format!("ID {} · {}", info.id, info.constellations.join(", "));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			ctx.set_fill_style_str(&format!("rgba(226, 232, 240, {})", t));
			let _ = ctx.fill_text(&detail, x, y + radius + 14.0 / k);
		}
		ctx.set_text_align("start");
	});
}

fn draw_donkey(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some((x, y)) = state.current.and_then(|id| state.position_of(id)) else {
		return;
	};
	let k = state.transform.k;
	let pulse = 1.0 + 0.15 * (state.flow_time * 2.0 * PI).sin();
	let (fill, label) = if state.alive {
		(DONKEY, "🫏")
	} else {
		("#6b7280", "💀")
	};

	ctx.begin_path();
	let _ = ctx.arc(x, y, 15.0 * pulse, 0.0, 2.0 * PI);
	ctx.set_global_alpha(0.85);
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_global_alpha(1.0);
	ctx.set_stroke_style_str("#ffffff");
	ctx.set_line_width(3.0 / k);
	ctx.stroke();

	ctx.set_font("20px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, x, y);
	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
}
