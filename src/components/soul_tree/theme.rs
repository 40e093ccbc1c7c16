//! Visual theming for the soul tree.
//!
//! Provides the colour types used by the simulation and the compositor, and
//! the fixed palette of the scene (background, trunk, mode overrides).

/// RGBA color representation for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Continuous RGB triple (0.0..=255.0 per channel) for colours that drift
/// smoothly, such as the trunk tint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
	pub r: f64,
	pub g: f64,
	pub b: f64,
}

impl Rgb {
	pub const fn new(r: f64, g: f64, b: f64) -> Self {
		Self { r, g, b }
	}

	pub fn lerp(self, other: Rgb, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: self.r + (other.r - self.r) * t,
			g: self.g + (other.g - self.g) * t,
			b: self.b + (other.b - self.b) * t,
		}
	}

	/// Exponential approach: `self += (target - self) * alpha`.
	pub fn approach(&mut self, target: Rgb, alpha: f64) {
		self.r += (target.r - self.r) * alpha;
		self.g += (target.g - self.g) * alpha;
		self.b += (target.b - self.b) * alpha;
	}

	/// Largest per-channel distance to `other`.
	pub fn max_channel_diff(self, other: Rgb) -> f64 {
		(self.r - other.r)
			.abs()
			.max((self.g - other.g).abs())
			.max((self.b - other.b).abs())
	}

	pub fn to_color(self) -> Color {
		let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
		Color::rgb(channel(self.r), channel(self.g), channel(self.b))
	}
}

/// Trunk and star colour while hope is active.
pub const GOLD: Rgb = Rgb::new(255.0, 200.0, 80.0);
/// Trunk colour while rage is active.
pub const RAGE_RED: Rgb = Rgb::new(255.0, 40.0, 30.0);

/// Fixed colours of the scene.
#[derive(Clone, Debug)]
pub struct SceneTheme {
	/// Background at zero vitality
	pub background_dim: Color,
	/// Background at full vitality
	pub background_lit: Color,
	/// Tint the background pulses toward during rage
	pub rage_background: Color,
	/// Trunk/glow override during rage
	pub rage_trunk: Color,
	/// Trunk/glow override during hope
	pub hope_trunk: Color,
	/// Star core colour
	pub star: Color,
	/// Glyph particles of the rage text
	pub glyph: Color,
	/// Sparks trailing the mascot
	pub spark: Color,
	/// Mascot body
	pub mascot: Color,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

impl Default for SceneTheme {
	fn default() -> Self {
		Self {
			background_dim: Color::rgb(5, 5, 8),
			background_lit: Color::rgb(24, 26, 40),
			rage_background: Color::rgb(60, 6, 8),
			rage_trunk: RAGE_RED.to_color(),
			hope_trunk: GOLD.to_color(),
			star: Color::rgb(255, 244, 200),
			glyph: Color::rgb(255, 120, 90),
			spark: Color::rgb(255, 150, 60),
			mascot: Color::rgb(255, 90, 40),
			vignette: 0.35,
		}
	}
}
