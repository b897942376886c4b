use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{ForceGraphState, Hit};
use crate::graph::StarId;
use crate::reconcile::{EdgeKey, ViewSnapshot};

/// Pointer travel, in pixels, beyond which a press becomes a pan.
const CLICK_SLOP: f64 = 3.0;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Draws a [`ViewSnapshot`] and reports clicks on stars and edges.
///
/// Star positions come from the snapshot; the force layout only animates the
/// first frames after a new graph arrives.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] snapshot: Signal<Option<ViewSnapshot>>,
	#[prop(optional, into)] on_star_click: Option<Callback<StarId>>,
	#[prop(optional, into)] on_edge_click: Option<Callback<EdgeKey>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let size = Rc::new(RefCell::new((0.0, 0.0)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, size_init, animate_init, resize_cb_init) = (
		state.clone(),
		size.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		*size_init.borrow_mut() = (w, h);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("canvas 2d context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() = snapshot
			.get_untracked()
			.map(|snap| ForceGraphState::new(&snap, w, h));

		if fullscreen {
			let (state_resize, size_resize, canvas_resize) =
				(state_init.clone(), size_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				*size_resize.borrow_mut() = (nw, nh);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, size_anim, animate_inner) =
			(state_init.clone(), size_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			match *state_anim.borrow_mut() {
				Some(ref mut s) => {
					s.tick(0.016);
					render::render(s, &ctx);
				}
				None => {
					let (w, h) = *size_anim.borrow();
					render::render_empty(&ctx, w, h);
				}
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Restyle or rebuild whenever the session publishes a new view.
	let (state_up, size_up) = (state.clone(), size.clone());
	Effect::new(move |_| {
		let next = snapshot.get();
		let mut slot = state_up.borrow_mut();
		match (slot.as_mut(), next) {
			(Some(s), Some(snap)) => s.apply(&snap),
			(None, Some(snap)) => {
				let (w, h) = *size_up.borrow();
				if w > 0.0 {
					debug!("drawing {} stars", snap.nodes.len());
					*slot = Some(ForceGraphState::new(&snap, w, h));
				}
			}
			(_, None) => *slot = None,
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pan.active = true;
			s.pan.moved = false;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				if s.pan.moved || dx.hypot(dy) > CLICK_SLOP {
					s.pan.moved = true;
					s.transform.x = s.pan.transform_start_x + dx;
					s.transform.y = s.pan.transform_start_y + dy;
				}
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);
		// release the borrow before handing control to the callbacks
		let hit = {
			let mut slot = state_mu.borrow_mut();
			let Some(s) = slot.as_mut() else {
				return;
			};
			let clicked = s.pan.active && !s.pan.moved;
			s.pan.active = false;
			s.pan.moved = false;
			if clicked { s.hit(x, y) } else { None }
		};
		match hit {
			Some(Hit::Star(id)) => {
				if let Some(cb) = on_star_click {
					cb.run(id);
				}
			}
			Some(Hit::Edge(key)) => {
				if let Some(cb) = on_edge_click {
					cb.run(key);
				}
			}
			None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pan.active = false;
			s.pan.moved = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, &ev);

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 4.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: pointer;"
		/>
	}
}
