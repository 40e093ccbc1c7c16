//! Canvas compositor for the soul tree.
//!
//! Draws one frame from a read-only [`SimulationState`]. Passes, back to front:
//! 1. Background (vitality brightness, rage pulse)
//! 2. Branches with sway and trunk glow
//! 3. Blooms, attached and falling
//! 4. Projectiles in flight
//! 5. Mode overlays (rage trail, mascot, glyph text; hope star)
//! 6. Vignette

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::bloom::Bloom;
use super::mood::{ModeKind, RageEffect, Star};
use super::state::SimulationState;
use super::theme::{Color, SceneTheme};
use super::tree::Sway;

/// Standard smoothstep on `[0, 1]`.
fn smooth_step(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	t * t * (3.0 - 2.0 * t)
}

/// Background fill for a given brightness, pulled toward the rage tint by
/// `rage_pulse` (0 outside rage).
pub fn background_color(theme: &SceneTheme, brightness: f64, rage_pulse: f64) -> Color {
	theme
		.background_dim
		.lerp(theme.background_lit, smooth_step(brightness))
		.lerp(theme.rage_background, rage_pulse.clamp(0.0, 1.0))
}

/// Rage background pulse in `[0, 1]`.
pub fn rage_pulse(time: f64) -> f64 {
	0.5 + 0.5 * (time * 4.0).sin()
}

/// Renders the complete scene to the canvas.
pub fn render(state: &SimulationState, ctx: &CanvasRenderingContext2d, theme: &SceneTheme) {
	draw_background(state, ctx, theme);
	draw_tree(state, ctx, theme);
	draw_blooms(state, ctx);
	draw_projectiles(state, ctx);

	if let Some(rage) = state.mode.rage() {
		draw_rage(state, ctx, theme, rage);
	}
	if let Some(star) = state.mode.star() {
		draw_star(state, ctx, theme, star);
	}

	if theme.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &SimulationState, ctx: &CanvasRenderingContext2d, theme: &SceneTheme) {
	let pulse = if state.mode.rage().is_some() {
		rage_pulse(state.time)
	} else {
		0.0
	};
	let color = background_color(theme, state.vitality.brightness(), pulse);
	ctx.set_fill_style_str(&color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_tree(state: &SimulationState, ctx: &CanvasRenderingContext2d, theme: &SceneTheme) {
	let sway = state.sway();
	let trunk = match state.mode.kind() {
		ModeKind::Rage => theme.rage_trunk,
		ModeKind::Hope => theme.hope_trunk,
		_ => state.trunk_color().to_color(),
	};
	let glow = match state.mode.kind() {
		ModeKind::Rage | ModeKind::Hope => 25.0,
		_ => state.vitality.glow_radius(),
	};

	ctx.save();
	ctx.set_line_cap("round");
	if glow > 0.0 {
		ctx.set_shadow_blur(glow);
		ctx.set_shadow_color(&trunk.to_css());
	}

	for branch in &state.branches {
		let (from, to) = sway.apply(branch);
		// Outer branches are slightly fainter.
		let alpha = 1.0 - branch.depth as f64 * 0.04;
		ctx.set_stroke_style_str(&trunk.with_alpha(alpha).to_css());
		ctx.set_line_width(branch.width);
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x, to.y);
		ctx.stroke();
	}
	ctx.restore();
}

fn draw_blooms(state: &SimulationState, ctx: &CanvasRenderingContext2d) {
	let sway = state.sway();
	ctx.save();
	for bloom in &state.blooms.blooms {
		draw_bloom(ctx, bloom, &sway, state.time);
	}
	ctx.restore();
}

fn draw_bloom(ctx: &CanvasRenderingContext2d, bloom: &Bloom, sway: &Sway, time: f64) {
	if bloom.size <= 0.0 {
		return;
	}
	let position = if bloom.detached() {
		bloom.position
	} else {
		bloom.position + sway.offset(bloom.position, bloom.depth)
	};
	let alpha = if bloom.detached() {
		0.9
	} else {
		bloom.breath(time)
	};
	let color = bloom.color.to_color();

	ctx.set_shadow_blur(bloom.size * 3.0);
	ctx.set_shadow_color(&color.to_css());
	ctx.set_fill_style_str(&color.lighten(0.2).with_alpha(alpha).to_css());
	ctx.begin_path();
	let _ = ctx.arc(position.x, position.y, bloom.size, 0.0, PI * 2.0);
	ctx.fill();
}

fn draw_projectiles(state: &SimulationState, ctx: &CanvasRenderingContext2d) {
	ctx.save();
	for p in &state.projectiles.projectiles {
		let color = p.color.to_color();
		let head = p.position();

		// Short tail sampled back along the curve.
		let tail = p.position_at(p.progress - 0.05);
		ctx.set_stroke_style_str(&color.with_alpha(0.4).to_css());
		ctx.set_line_width(2.0);
		ctx.begin_path();
		ctx.move_to(tail.x, tail.y);
		ctx.line_to(head.x, head.y);
		ctx.stroke();

		ctx.set_shadow_blur(12.0);
		ctx.set_shadow_color(&color.to_css());
		ctx.set_fill_style_str(&color.lighten(0.4).to_css());
		ctx.begin_path();
		let _ = ctx.arc(head.x, head.y, 4.0, 0.0, PI * 2.0);
		ctx.fill();
	}
	ctx.restore();
}

fn draw_rage(
	state: &SimulationState,
	ctx: &CanvasRenderingContext2d,
	theme: &SceneTheme,
	rage: &RageEffect,
) {
	ctx.save();

	for spark in &rage.trail.sparks {
		ctx.set_fill_style_str(&theme.spark.with_alpha(spark.alpha()).to_css());
		ctx.begin_path();
		let _ = ctx.arc(spark.position.x, spark.position.y, spark.size, 0.0, PI * 2.0);
		ctx.fill();
	}

	if let Some(mascot) = &rage.mascot {
		let (x, y) = (mascot.position.x, mascot.position.y);
		ctx.set_shadow_blur(20.0);
		ctx.set_shadow_color(&theme.mascot.to_css());
		ctx.set_fill_style_str(&theme.mascot.to_css());
		ctx.begin_path();
		let _ = ctx.arc(x, y, 14.0, 0.0, PI * 2.0);
		ctx.fill();

		// Eyes, looking where it is going.
		ctx.set_shadow_blur(0.0);
		ctx.set_fill_style_str("#fff");
		for dy in [-4.0, 4.0] {
			ctx.begin_path();
			let _ = ctx.arc(x + 5.0, y + dy, 2.5, 0.0, PI * 2.0);
			ctx.fill();
		}
	}

	if let Some(reveal) = &rage.reveal {
		ctx.set_shadow_blur(6.0);
		ctx.set_shadow_color(&theme.glyph.to_css());
		for p in &reveal.particles {
			let alpha = p.twinkle_alpha(state.time);
			ctx.set_fill_style_str(&theme.glyph.with_alpha(alpha).to_css());
			ctx.begin_path();
			let _ = ctx.arc(p.position.x, p.position.y, p.size, 0.0, PI * 2.0);
			ctx.fill();
		}
	}

	ctx.restore();
}

fn draw_star(
	state: &SimulationState,
	ctx: &CanvasRenderingContext2d,
	theme: &SceneTheme,
	star: &Star,
) {
	let pulse = star.pulse(state.time);
	let (x, y) = (star.position.x, star.position.y);
	let ray = 40.0 + 30.0 * pulse;

	ctx.save();
	ctx.set_shadow_blur(30.0 * pulse);
	ctx.set_shadow_color(&theme.hope_trunk.to_css());

	// Cross-hair rays.
	ctx.set_stroke_style_str(&theme.star.with_alpha(0.5 * pulse).to_css());
	ctx.set_line_width(1.5);
	ctx.begin_path();
	ctx.move_to(x - ray, y);
	ctx.line_to(x + ray, y);
	ctx.move_to(x, y - ray);
	ctx.line_to(x, y + ray);
	ctx.stroke();

	if let Ok(halo) = ctx.create_radial_gradient(x, y, 0.0, x, y, ray * 0.5) {
		let _ = halo.add_color_stop(0.0, &theme.star.with_alpha(pulse).to_css());
		let _ = halo.add_color_stop(1.0, &theme.hope_trunk.with_alpha(0.0).to_css());
		#[allow(deprecated)]
		ctx.set_fill_style(&halo);
		ctx.begin_path();
		let _ = ctx.arc(x, y, ray * 0.5, 0.0, PI * 2.0);
		ctx.fill();
	}

	ctx.set_fill_style_str(&theme.star.to_css());
	ctx.begin_path();
	let _ = ctx.arc(x, y, 4.0 + 2.0 * pulse, 0.0, PI * 2.0);
	ctx.fill();
	ctx.restore();
}

fn draw_vignette(state: &SimulationState, ctx: &CanvasRenderingContext2d, theme: &SceneTheme) {
	let Ok(gradient) = ctx.create_radial_gradient(
		state.width / 2.0,
		state.height / 2.0,
		state.width.min(state.height) * 0.3,
		state.width / 2.0,
		state.height / 2.0,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(1.0, &format!("rgba(0, 0, 0, {})", theme.vignette));

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_background_brightens_with_vitality() {
		let theme = SceneTheme::default();
		assert_eq!(background_color(&theme, 0.0, 0.0), theme.background_dim);
		assert_eq!(background_color(&theme, 1.0, 0.0), theme.background_lit);
		let mid = background_color(&theme, 0.5, 0.0);
		assert!(mid.b > theme.background_dim.b && mid.b < theme.background_lit.b);
	}

	#[test]
	fn test_rage_pulse_pulls_toward_red() {
		let theme = SceneTheme::default();
		assert_eq!(background_color(&theme, 0.3, 1.0), theme.rage_background);
		for i in 0..100 {
			assert!((0.0..=1.0).contains(&rage_pulse(i as f64 * 0.1)));
		}
	}
}
