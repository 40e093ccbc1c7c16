//! Leptos component wrapping the soul tree canvas.
//!
//! The component creates a fullscreen canvas, builds the [`Simulation`] once
//! the canvas is mounted and drives it from a `requestAnimationFrame` loop.
//! Submissions and wind gusts arrive through reactive signals and are applied
//! between frames; the window `resize` event regenerates the tree.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::config::SceneConfig;
use super::raster::CanvasTextRasterizer;
use super::render;
use super::state::Simulation;
use super::theme::SceneTheme;
use super::types::{Submission, Suggestion};

/// Fixed animation step, in seconds.
const FRAME_DT: f64 = 0.016;

/// Bundles the simulation with its drawing surface and palette.
struct SceneContext {
	sim: Simulation,
	ctx: CanvasRenderingContext2d,
	theme: SceneTheme,
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let read = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(
		read(window.inner_width(), 800.0),
		read(window.inner_height(), 600.0),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Renders the soul tree scene on a fullscreen canvas.
///
/// Every new value of `submission` (distinguished by its sequence number) is
/// fed to the tree; every change of the `wind` counter triggers a wind gust.
/// When the submission pattern suggests a change of view, `on_suggest` is
/// called with the suggestion; acting on it is up to the host.
#[component]
pub fn SoulTreeCanvas(
	#[prop(optional)] config: SceneConfig,
	#[prop(into)] submission: Signal<Option<Submission>>,
	#[prop(into)] wind: Signal<u32>,
	#[prop(optional)] on_suggest: Option<Callback<Suggestion>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<SceneContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = viewport_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			log::warn!("soul-tree: 2d canvas context unavailable");
			return;
		};

		let seed = js_sys::Date::now() as u64;
		*context_init.borrow_mut() = Some(SceneContext {
			sim: Simulation::new(
				config.clone(),
				w,
				h,
				seed,
				Box::new(CanvasTextRasterizer),
			),
			ctx,
			theme: SceneTheme::default(),
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = viewport_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.sim.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.sim.advance_frame(FRAME_DT);
				render::render(c.sim.state(), &c.ctx, &c.theme);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_submit = context.clone();
	Effect::new(move |_| {
		let Some(sub) = submission.get() else {
			return;
		};
		let suggestion = match *context_submit.borrow_mut() {
			Some(ref mut c) => c.sim.submit(&sub.mood_id, &sub.text),
			None => {
				log::warn!("soul-tree: submission #{} before scene was ready", sub.seq);
				None
			}
		};
		if let (Some(s), Some(cb)) = (suggestion, on_suggest) {
			cb.run(s);
		}
	});

	let context_wind = context.clone();
	Effect::new(move |prev: Option<u32>| {
		let gusts = wind.get();
		if prev.is_some_and(|p| p != gusts) {
			if let Some(ref mut c) = *context_wind.borrow_mut() {
				c.sim.trigger_wind();
			}
		}
		gusts
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="soul-tree-canvas"
			style="display: block; position: fixed; inset: 0;"
		/>
	}
}
