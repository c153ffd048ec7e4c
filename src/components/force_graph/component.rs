//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, and zooming. An animation loop runs via
//! `requestAnimationFrame`, calling the physics simulation and renderer each frame.
//! Every new `data` value swaps in a fresh simulation; the loop itself is
//! started once and lives as long as the page.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::GraphData;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Bundles graph simulation state with its drawing target and visual configuration.
struct GraphContext {
	state: ForceGraphState,
	ctx: CanvasRenderingContext2d,
	scale: ScaleConfig,
	theme: Theme,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Size of the canvas' parent container, or a fallback before layout.
fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let Some(parent) = canvas.parent_element() else {
		return FALLBACK_SIZE;
	};
	let (w, h) = (parent.client_width() as f64, parent.client_height() as f64);
	(
		if w > 0.0 { w } else { FALLBACK_SIZE.0 },
		if h > 0.0 { h } else { FALLBACK_SIZE.1 },
	)
}

/// Mouse position relative to the canvas' top-left corner.
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders an interactive force-directed graph on a canvas element.
///
/// Pass graph data via the reactive `data` signal. The canvas takes the size
/// of its parent container each time the data changes.
#[component]
pub fn ForceGraphCanvas(#[prop(into)] data: Signal<GraphData>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let context_init = context.clone();

	Effect::new(move |_| {
		let graph_data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				warn!("tagnet: canvas 2d context unavailable");
				return;
			}
		};

		// the previous run's simulation is dropped here
		let theme = Theme::default();
		let scale = ScaleConfig::default();
		*context_init.borrow_mut() = Some(GraphContext {
			state: ForceGraphState::new(&graph_data, w, h, &theme, &scale),
			ctx,
			scale,
			theme,
		});

		if animate.borrow().is_some() {
			return;
		}
		let (context_anim, animate_inner) = (context_init.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(0.016);
				render::render(&c.state, &c.ctx, &c.scale, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Runs `f` on the live state with the pointer position in canvas pixels.
	let with_pointer = {
		let context = context.clone();
		move |ev: &MouseEvent, f: &dyn Fn(&mut GraphContext, f64, f64)| {
			let Some(canvas) = canvas_ref.get() else {
				return;
			};
			let (x, y) = canvas_point(&canvas.into(), ev);
			if let Some(ref mut c) = *context.borrow_mut() {
				f(c, x, y);
			}
		}
	};

	let on_mousedown = {
		let with_pointer = with_pointer.clone();
		move |ev: MouseEvent| {
			with_pointer(&ev, &|c: &mut GraphContext, x: f64, y: f64| c.state.pointer_down(x, y, &c.scale));
		}
	};
	let on_mousemove = {
		let with_pointer = with_pointer.clone();
		move |ev: MouseEvent| {
			with_pointer(&ev, &|c: &mut GraphContext, x: f64, y: f64| c.state.pointer_move(x, y, &c.scale));
		}
	};
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let delta = ev.delta_y();
		with_pointer(&ev, &|c: &mut GraphContext, x: f64, y: f64| c.state.wheel(x, y, delta));
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.state.pointer_up();
		}
	};
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context.borrow_mut() {
			c.state.pointer_leave();
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
			style="display: block; cursor: grab;"
		/>
	}
}
