//! Tree vitality and trunk tint.
//!
//! Vitality is a bounded scalar raised by every submission. The trunk tint
//! never jumps: submissions move a *target* colour and the displayed colour
//! follows it by exponential smoothing each frame. Only a wind reset sets
//! both back discontinuously.

use super::theme::Rgb;
use super::types::MoodClass;

pub const VITALITY_FLOOR: f64 = 10.0;
pub const VITALITY_MAX: f64 = 100.0;
/// Vitality below which the trunk does not glow at all.
pub const GLOW_FLOOR: f64 = 20.0;

const GOOD_STEP: f64 = 8.0;
const HEAVY_STEP: f64 = 1.5;
/// Per-frame smoothing factor toward the target colour.
const COLOR_ALPHA: f64 = 0.05;
const GOOD_BLEND: f64 = 0.5;
const HEAVY_BLEND: f64 = 0.3;

pub const NEUTRAL_GRAY: Rgb = Rgb::new(120.0, 120.0, 130.0);
pub const WARM: Rgb = Rgb::new(255.0, 190.0, 110.0);

#[derive(Clone, Debug, PartialEq)]
pub struct VitalityState {
	vitality: f64,
	color: Rgb,
	target: Rgb,
	/// Passive loss per frame
	decay: f64,
}

impl VitalityState {
	pub fn new(decay: f64) -> Self {
		Self {
			vitality: VITALITY_FLOOR,
			color: NEUTRAL_GRAY,
			target: NEUTRAL_GRAY,
			decay: decay.max(0.0),
		}
	}

	/// Apply one submission. `mood_color` only matters for heavy moods.
	pub fn apply_mood_contribution(&mut self, class: MoodClass, mood_color: Rgb) {
		match class {
			MoodClass::Good => {
				self.vitality += GOOD_STEP;
				self.target = self.target.lerp(WARM, GOOD_BLEND);
			}
			MoodClass::Heavy => {
				self.vitality += HEAVY_STEP;
				self.target = self.target.lerp(mood_color, HEAVY_BLEND);
			}
		}
		self.vitality = self.vitality.clamp(0.0, VITALITY_MAX);
	}

	/// Per-frame update: drift the colour and apply passive decay.
	pub fn tick(&mut self) {
		self.color.approach(self.target, COLOR_ALPHA);
		if self.decay > 0.0 && self.vitality > VITALITY_FLOOR {
			self.vitality = (self.vitality - self.decay).max(VITALITY_FLOOR);
		}
	}

	/// The only sanctioned discontinuity.
	pub fn reset(&mut self) {
		self.vitality = VITALITY_FLOOR;
		self.color = NEUTRAL_GRAY;
		self.target = NEUTRAL_GRAY;
	}

	pub fn vitality(&self) -> f64 {
		self.vitality
	}

	pub fn color(&self) -> Rgb {
		self.color
	}

	pub fn target(&self) -> Rgb {
		self.target
	}

	/// Trunk glow blur radius in pixels.
	pub fn glow_radius(&self) -> f64 {
		((self.vitality - GLOW_FLOOR) * 0.4).clamp(0.0, (VITALITY_MAX - GLOW_FLOOR) * 0.4)
	}

	/// Background brightness in `[0, 1]`.
	pub fn brightness(&self) -> f64 {
		(self.vitality / VITALITY_MAX).clamp(0.0, 1.0)
	}
}

impl Default for VitalityState {
	fn default() -> Self {
		Self::new(0.0)
	}
}
