//! Text-to-point-cloud rasterization.
//!
//! The rage overlay needs the pixel footprint of a string. In the browser the
//! string is drawn once onto a detached canvas and its alpha channel sampled
//! on a coarse grid; tests substitute their own [`TextRasterizer`].

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::types::Point;

/// Grid spacing, in pixels, between sampled points.
pub const SAMPLE_GAP: u32 = 4;
/// Alpha above which a pixel counts as inked.
const ALPHA_THRESHOLD: u8 = 128;

/// Turns a string into target points laid out in a `width` x `height` viewport.
pub trait TextRasterizer {
	fn rasterize(&self, text: &str, width: f64, height: f64) -> Vec<Point>;
}

/// Collect grid points whose alpha exceeds the threshold from an RGBA buffer.
pub fn sample_alpha_mask(rgba: &[u8], width: u32, height: u32, gap: u32) -> Vec<Point> {
	let gap = gap.max(1) as usize;
	let (w, h) = (width as usize, height as usize);
	let mut points = Vec::new();
	for y in (0..h).step_by(gap) {
		for x in (0..w).step_by(gap) {
			let alpha_index = (y * w + x) * 4 + 3;
			if rgba.get(alpha_index).is_some_and(|&a| a > ALPHA_THRESHOLD) {
				points.push(Point::new(x as f64, y as f64));
			}
		}
	}
	points
}

/// Font size that fits `text` across most of the viewport.
pub fn fit_font_size(text: &str, width: f64, height: f64) -> f64 {
	let chars = text.chars().count().max(1) as f64;
	(width * 1.6 / chars).min(height * 0.25).max(12.0)
}

/// Rasterizes on an off-screen `<canvas>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanvasTextRasterizer;

impl CanvasTextRasterizer {
	fn draw_and_sample(text: &str, width: f64, height: f64) -> Option<Vec<Point>> {
		let document = web_sys::window()?.document()?;
		let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
		let (w, h) = (width.max(1.0) as u32, height.max(1.0) as u32);
		canvas.set_width(w);
		canvas.set_height(h);

		let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
		ctx.set_fill_style_str("#fff");
		ctx.set_font(&format!("bold {}px serif", fit_font_size(text, width, height)));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.fill_text(text, width / 2.0, height * 0.4).ok()?;

		let image = ctx.get_image_data(0.0, 0.0, w as f64, h as f64).ok()?;
		Some(sample_alpha_mask(&image.data(), w, h, SAMPLE_GAP))
	}
}

impl TextRasterizer for CanvasTextRasterizer {
	fn rasterize(&self, text: &str, width: f64, height: f64) -> Vec<Point> {
		Self::draw_and_sample(text, width, height).unwrap_or_else(|| {
			log::warn!("soul-tree: text rasterization unavailable, skipping reveal");
			Vec::new()
		})
	}
}
