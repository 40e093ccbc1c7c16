//! Mood effect state machine.
//!
//! Exactly one [`Mode`] is active. Non-normal modes own all of their overlay
//! objects (mascot, trail, glyph particles, star, shake), so leaving a mode
//! drops them in one assignment and nothing can be left half-cleared.
//!
//! Transitions are decided by [`transition`], a pure table over the current
//! [`ModeKind`] and an incoming [`ModeEvent`]:
//!
//! | current      | event               | result        |
//! |--------------|---------------------|---------------|
//! | Normal       | Arrival(k != Normal)| Enter(k)      |
//! | k            | Arrival(k)          | Refresh       |
//! | k            | Arrival(j != k)     | Switch(j)     |
//! | any          | Arrival(Normal)     | Stay          |
//! | k != Normal  | TimerExpired        | Exit          |
//! | any          | WindReset           | Exit          |

use rand::Rng;
use rand::seq::SliceRandom;

use super::particles::{GlyphReveal, SparkTrail};
use super::raster::TextRasterizer;
use super::types::{Point, ProjectileKind, Vector};

/// Gentle sway amplitude in normal weather, in pixels.
pub const BASE_SWAY: f64 = 1.5;
const HOPE_SWAY_FACTOR: f64 = 3.0;
/// Initial happy shake amplitude, in pixels.
pub const HAPPY_SHAKE: f64 = 12.0;
const SHAKE_DECAY: f64 = 0.95;

const MASCOT_START_X: f64 = -60.0;
const MASCOT_SPEED: f64 = 12.0;
const MASCOT_EXIT_MARGIN: f64 = 60.0;
const SPARKS_PER_FRAME: usize = 2;
/// Cap on sampled text points.
pub const MAX_GLYPH_POINTS: usize = 1500;
const GLYPHS_PER_FRAME: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeKind {
	Normal,
	Rage,
	Hope,
	Happy,
}

impl From<ProjectileKind> for ModeKind {
	fn from(kind: ProjectileKind) -> Self {
		match kind {
			ProjectileKind::Normal => ModeKind::Normal,
			ProjectileKind::Rage => ModeKind::Rage,
			ProjectileKind::Hope => ModeKind::Hope,
			ProjectileKind::Happy => ModeKind::Happy,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeEvent {
	Arrival(ProjectileKind),
	TimerExpired,
	WindReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
	Stay,
	Enter(ModeKind),
	Refresh,
	Switch(ModeKind),
	Exit,
}

/// The transition table.
pub fn transition(current: ModeKind, event: ModeEvent) -> Transition {
	match event {
		ModeEvent::WindReset => Transition::Exit,
		ModeEvent::TimerExpired if current == ModeKind::Normal => Transition::Stay,
		ModeEvent::TimerExpired => Transition::Exit,
		ModeEvent::Arrival(kind) => match (current, ModeKind::from(kind)) {
			(_, ModeKind::Normal) => Transition::Stay,
			(ModeKind::Normal, next) => Transition::Enter(next),
			(cur, next) if cur == next => Transition::Refresh,
			(_, next) => Transition::Switch(next),
		},
	}
}

/// The offscreen mascot crossing the scene during rage.
#[derive(Clone, Debug, PartialEq)]
pub struct Mascot {
	pub position: Point,
	pub velocity: Vector,
}

/// Overlay state of rage: mascot flight, then text reveal.
#[derive(Clone, Debug)]
pub struct RageEffect {
	pub mascot: Option<Mascot>,
	pub trail: SparkTrail,
	pub reveal: Option<GlyphReveal>,
	pub text: String,
}

impl RageEffect {
	pub fn new(text: String, height: f64) -> Self {
		Self {
			mascot: Some(Mascot {
				position: Point::new(MASCOT_START_X, height * 0.3),
				velocity: Vector::new(MASCOT_SPEED, 0.0),
			}),
			trail: SparkTrail::default(),
			reveal: None,
			text,
		}
	}

	pub fn update<R: Rng + ?Sized>(
		&mut self,
		width: f64,
		height: f64,
		rasterizer: &dyn TextRasterizer,
		rng: &mut R,
	) {
		self.trail.update();

		if let Some(mascot) = &mut self.mascot {
			mascot.position = mascot.position + mascot.velocity;
			self.trail.emit(mascot.position, SPARKS_PER_FRAME, rng);

			if mascot.position.x > width + MASCOT_EXIT_MARGIN {
				let exit = Point::new(width, mascot.position.y);
				self.mascot = None;

				let mut points = rasterizer.rasterize(&self.text, width, height);
				points.shuffle(rng);
				points.truncate(MAX_GLYPH_POINTS);
				log::debug!("soul-tree: revealing {:?} with {} glyph points", self.text, points.len());

				let mut reveal = GlyphReveal::new(points, GLYPHS_PER_FRAME);
				reveal.update(exit, rng);
				self.reveal = Some(reveal);
				return;
			}
		}

		if let Some(reveal) = &mut self.reveal {
			reveal.update(Point::new(width, height * 0.3), rng);
		}
	}
}

/// The pulsing star hung over the canopy during hope.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
	pub position: Point,
	pub phase: f64,
}

impl Star {
	/// Pulse brightness in `[0.4, 1.0]`.
	pub fn pulse(&self, time: f64) -> f64 {
		0.7 + 0.3 * (time * 3.0 + self.phase).sin()
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct HopeEffect {
	pub star: Star,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HappyEffect {
	/// Current shake amplitude, decaying toward zero
	pub shake: f64,
}

/// The active mode and everything it owns.
#[derive(Clone, Debug, Default)]
pub enum Mode {
	#[default]
	Normal,
	Rage(RageEffect),
	Hope(HopeEffect),
	Happy(HappyEffect),
}

impl Mode {
	pub fn kind(&self) -> ModeKind {
		match self {
			Mode::Normal => ModeKind::Normal,
			Mode::Rage(_) => ModeKind::Rage,
			Mode::Hope(_) => ModeKind::Hope,
			Mode::Happy(_) => ModeKind::Happy,
		}
	}
}

/// Process-wide mode value with its countdown.
#[derive(Clone, Debug)]
pub struct ModeState {
	mode: Mode,
	timer: u32,
	duration: u32,
}

impl ModeState {
	pub fn new(duration: u32) -> Self {
		Self {
			mode: Mode::Normal,
			timer: 0,
			duration: duration.max(1),
		}
	}

	pub fn mode(&self) -> &Mode {
		&self.mode
	}

	pub fn kind(&self) -> ModeKind {
		self.mode.kind()
	}

	pub fn timer(&self) -> u32 {
		self.timer
	}

	pub fn duration(&self) -> u32 {
		self.duration
	}

	/// Replace the active mode with a freshly entered one.
	pub fn enter(&mut self, mode: Mode) {
		self.timer = match mode {
			Mode::Normal => 0,
			_ => self.duration,
		};
		self.mode = mode;
	}

	/// Same mode again: restart the countdown, leave overlay objects alone.
	pub fn refresh(&mut self) {
		if self.kind() != ModeKind::Normal {
			self.timer = self.duration;
		}
	}

	/// Back to normal, dropping every overlay object.
	pub fn exit(&mut self) {
		self.mode = Mode::Normal;
		self.timer = 0;
	}

	/// Advance overlay objects one frame. Returns `true` when the countdown
	/// just reached zero.
	pub fn tick<R: Rng + ?Sized>(
		&mut self,
		width: f64,
		height: f64,
		rasterizer: &dyn TextRasterizer,
		rng: &mut R,
	) -> bool {
		match &mut self.mode {
			Mode::Normal => return false,
			Mode::Rage(rage) => rage.update(width, height, rasterizer, rng),
			Mode::Hope(_) => {}
			Mode::Happy(happy) => happy.shake *= SHAKE_DECAY,
		}
		self.timer = self.timer.saturating_sub(1);
		self.timer == 0
	}

	/// Sway amplitude for the current mode.
	pub fn sway_amplitude(&self) -> f64 {
		match self.mode {
			Mode::Hope(_) => BASE_SWAY * HOPE_SWAY_FACTOR,
			_ => BASE_SWAY,
		}
	}

	pub fn shake(&self) -> f64 {
		match &self.mode {
			Mode::Happy(happy) => happy.shake,
			_ => 0.0,
		}
	}

	pub fn star(&self) -> Option<&Star> {
		match &self.mode {
			Mode::Hope(hope) => Some(&hope.star),
			_ => None,
		}
	}

	pub fn rage(&self) -> Option<&RageEffect> {
		match &self.mode {
			Mode::Rage(rage) => Some(rage),
			_ => None,
		}
	}

	/// Count of transient overlay objects still alive (mascot, star, sparks,
	/// glyph particles).
	pub fn overlay_objects(&self) -> usize {
		match &self.mode {
			Mode::Normal | Mode::Happy(_) => 0,
			Mode::Hope(_) => 1,
			Mode::Rage(rage) => {
				usize::from(rage.mascot.is_some())
					+ rage.trail.len()
					+ rage.reveal.as_ref().map_or(0, |r| r.particles.len() + r.pending())
			}
		}
	}
}
