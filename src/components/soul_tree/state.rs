//! Scene simulation state.
//!
//! [`Simulation`] is the single writer of everything on screen. The host calls
//! [`Simulation::submit`] and [`Simulation::trigger_wind`] from event handlers
//! and [`Simulation::advance_frame`] once per display refresh; the compositor
//! only ever reads the resulting [`SimulationState`].

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::bloom::BloomField;
use super::config::SceneConfig;
use super::mood::{
	HAPPY_SHAKE, HappyEffect, HopeEffect, Mode, ModeEvent, ModeKind, ModeState, RageEffect, Star,
	Transition, transition,
};
use super::projectile::{Arrival, ProjectileSystem};
use super::raster::TextRasterizer;
use super::theme::{GOLD, RAGE_RED, Rgb};
use super::tree::{Branch, Sway, TreeGenerator, canopy_tips, crown};
use super::tracker::SubmissionTracker;
use super::types::{Mood, MoodClass, Point, ProjectileKind, Suggestion};
use super::vitality::VitalityState;

/// Distance of the input anchor above the bottom edge.
const INPUT_OFFSET: f64 = 60.0;
/// Radial force of a wind gust.
pub const WIND_FORCE: f64 = 6.0;
/// Radial force of the happy confetti burst.
pub const HAPPY_FORCE: f64 = 4.0;

/// Everything the compositor draws.
#[derive(Clone, Debug)]
pub struct SimulationState {
	pub width: f64,
	pub height: f64,
	pub branches: Vec<Branch>,
	/// Indices into `branches` of outer-canopy tips
	pub tips: Vec<usize>,
	pub vitality: VitalityState,
	pub projectiles: ProjectileSystem,
	pub blooms: BloomField,
	pub mode: ModeState,
	/// Animation clock, in seconds
	pub time: f64,
	pub frame: u64,
}

impl SimulationState {
	/// Where projectiles are launched from.
	pub fn input_origin(&self) -> Point {
		Point::new(self.width / 2.0, self.height - INPUT_OFFSET)
	}

	/// Top of the trunk, the centre wind and confetti blow away from.
	pub fn trunk_top(&self) -> Point {
		self.branches
			.first()
			.map(|b| b.end)
			.unwrap_or_else(|| self.center())
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// Sway applied to the skeleton this frame.
	pub fn sway(&self) -> Sway {
		Sway {
			time: self.time,
			amplitude: self.mode.sway_amplitude(),
			shake: self.mode.shake(),
		}
	}

	/// Trunk colour actually drawn, with mode overrides applied.
	pub fn trunk_color(&self) -> Rgb {
		match self.mode.kind() {
			ModeKind::Rage => RAGE_RED,
			ModeKind::Hope => GOLD,
			_ => self.vitality.color(),
		}
	}

	/// Colour the trunk is heading toward, with mode overrides applied.
	pub fn trunk_target(&self) -> Rgb {
		match self.mode.kind() {
			ModeKind::Rage => RAGE_RED,
			ModeKind::Hope => GOLD,
			_ => self.vitality.target(),
		}
	}
}

pub struct Simulation {
	state: SimulationState,
	config: SceneConfig,
	generator: TreeGenerator,
	tracker: SubmissionTracker,
	rasterizer: Box<dyn TextRasterizer>,
	rng: SmallRng,
}

impl Simulation {
	/// Build a scene of the given size. `seed` is used unless the config pins
	/// one.
	pub fn new(
		config: SceneConfig,
		width: f64,
		height: f64,
		seed: u64,
		rasterizer: Box<dyn TextRasterizer>,
	) -> Self {
		let mut rng = SmallRng::seed_from_u64(config.seed.unwrap_or(seed));
		let generator = TreeGenerator::default();
		let branches = generator.generate(width, height, &mut rng);
		let tips = canopy_tips(&branches);
		log::info!(
			"soul-tree: scene {}x{} with {} branches ({} canopy tips)",
			width,
			height,
			branches.len(),
			tips.len()
		);

		Self {
			state: SimulationState {
				width,
				height,
				branches,
				tips,
				vitality: VitalityState::new(config.vitality_decay),
				projectiles: ProjectileSystem::default(),
				blooms: BloomField::new(width, height),
				mode: ModeState::new(config.mode_duration_frames),
				time: 0.0,
				frame: 0,
			},
			tracker: SubmissionTracker::new(config.suggestion_threshold),
			config,
			generator,
			rasterizer,
			rng,
		}
	}

	pub fn state(&self) -> &SimulationState {
		&self.state
	}

	pub fn config(&self) -> &SceneConfig {
		&self.config
	}

	/// Feed one mood and message to the tree. Never fails; unknown moods fall
	/// back to neutral and empty text is fine. Returns a view-change
	/// suggestion when the submission pattern calls for one.
	pub fn submit(&mut self, mood_id: &str, text: &str) -> Option<Suggestion> {
		let mood = Mood::resolve(mood_id);
		self.state
			.vitality
			.apply_mood_contribution(mood.class, mood.color);

		let origin = self.state.input_origin();
		let (target, depth) = match mood.kind {
			ProjectileKind::Rage => (Point::new(origin.x, -0.5 * self.state.height), 0),
			ProjectileKind::Hope => (Point::new(origin.x, 0.08 * self.state.height), 0),
			ProjectileKind::Normal | ProjectileKind::Happy => self.canopy_target(),
		};
		let projectile = self
			.state
			.projectiles
			.enqueue(origin, target, mood.color, mood.kind);
		projectile.text = text.trim().to_string();
		projectile.target_depth = depth;

		log::debug!(
			"soul-tree: {} submission ({:?}) toward ({:.0}, {:.0}), vitality {:.1}",
			mood.id,
			mood.kind,
			target.x,
			target.y,
			self.state.vitality.vitality()
		);

		let suggestion = self.tracker.record(&mood);
		if let Some(s) = &suggestion {
			log::info!(
				"soul-tree: suggesting room {:?} after {} x {:?}",
				s.target_room,
				s.count,
				s.reason
			);
		}
		suggestion
	}

	/// Wind gust: back to normal, vitality and tint reset, every bloom blown
	/// loose. Applied as one step between frames.
	pub fn trigger_wind(&mut self) {
		if transition(self.state.mode.kind(), ModeEvent::WindReset) == Transition::Exit {
			self.state.mode.exit();
		}
		self.state.vitality.reset();
		let center = self.state.trunk_top();
		self.state
			.blooms
			.detach_all(center, WIND_FORCE, &mut self.rng);
		log::info!(
			"soul-tree: wind reset, {} blooms blown loose",
			self.state.blooms.len()
		);
	}

	/// Advance one display frame; `dt` moves the animation clock.
	pub fn advance_frame(&mut self, dt: f64) {
		self.state.time += dt;
		self.state.frame += 1;

		self.state.vitality.tick();

		for arrival in self.state.projectiles.tick() {
			self.handle_arrival(arrival);
		}

		let (w, h) = (self.state.width, self.state.height);
		let expired = self
			.state
			.mode
			.tick(w, h, self.rasterizer.as_ref(), &mut self.rng);
		if expired && transition(self.state.mode.kind(), ModeEvent::TimerExpired) == Transition::Exit {
			log::info!("soul-tree: {:?} mode expired", self.state.mode.kind());
			self.state.mode.exit();
		}

		self.state.blooms.tick();
	}

	/// Regenerate the tree for a new viewport. In-flight projectiles, blooms
	/// and mode objects keep their coordinates.
	pub fn resize(&mut self, width: f64, height: f64) {
		if width == self.state.width && height == self.state.height {
			return;
		}
		self.state.width = width;
		self.state.height = height;
		self.state.branches = self.generator.generate(width, height, &mut self.rng);
		self.state.tips = canopy_tips(&self.state.branches);
		self.state.blooms.resize(width, height);
		log::info!(
			"soul-tree: resized to {}x{}, regenerated {} branches",
			width,
			height,
			self.state.branches.len()
		);
	}

	/// A random canopy tip and its depth, or the viewport centre.
	fn canopy_target(&mut self) -> (Point, u32) {
		match self.state.tips.choose(&mut self.rng) {
			Some(&i) => {
				let branch = &self.state.branches[i];
				(branch.end, branch.depth)
			}
			None => {
				log::warn!("soul-tree: no canopy tips, targeting viewport centre");
				(self.state.center(), 0)
			}
		}
	}

	fn handle_arrival(&mut self, arrival: Arrival) {
		let event = ModeEvent::Arrival(arrival.kind);
		match transition(self.state.mode.kind(), event) {
			Transition::Stay => {
				self.state.blooms.spawn_attached(
					arrival.position,
					arrival.color,
					arrival.target_depth,
					&mut self.rng,
				);
			}
			Transition::Refresh => {
				log::debug!("soul-tree: {:?} refreshed", self.state.mode.kind());
				self.state.mode.refresh();
			}
			Transition::Enter(next) | Transition::Switch(next) => {
				log::info!(
					"soul-tree: mode {:?} -> {:?}",
					self.state.mode.kind(),
					next
				);
				self.state.mode.exit();
				let mode = self.build_mode(next, arrival);
				self.state.mode.enter(mode);
			}
			Transition::Exit => self.state.mode.exit(),
		}
	}

	fn build_mode(&mut self, kind: ModeKind, arrival: Arrival) -> Mode {
		match kind {
			ModeKind::Normal => Mode::Normal,
			ModeKind::Rage => {
				let text = if arrival.text.is_empty() {
					self.config.rage_text.clone()
				} else {
					arrival.text
				};
				Mode::Rage(RageEffect::new(text, self.state.height))
			}
			ModeKind::Hope => {
				let position = crown(&self.state.branches)
					.unwrap_or_else(|| Point::new(self.state.width / 2.0, 0.15 * self.state.height));
				Mode::Hope(HopeEffect {
					star: Star {
						position,
						phase: self.rng.gen_range(0.0..std::f64::consts::TAU),
					},
				})
			}
			ModeKind::Happy => {
				self.happy_burst(arrival.color);
				Mode::Happy(HappyEffect { shake: HAPPY_SHAKE })
			}
		}
	}

	/// Confetti: every attached bloom is blown loose and a batch of new ones
	/// falls from random canopy tips.
	fn happy_burst(&mut self, fallback: Rgb) {
		let center = self.state.trunk_top();
		self.state
			.blooms
			.detach_all(center, HAPPY_FORCE, &mut self.rng);

		let palette: Vec<Rgb> = Mood::ALL
			.iter()
			.filter(|m| m.class == MoodClass::Good)
			.map(|m| m.color)
			.collect();
		for _ in 0..self.config.happy_burst {
			let position = match self.state.tips.choose(&mut self.rng) {
				Some(&i) => self.state.branches[i].end,
				None => self.state.center(),
			};
			let color = palette.choose(&mut self.rng).copied().unwrap_or(fallback);
			self.state
				.blooms
				.spawn_detached(position, color, center, HAPPY_FORCE, &mut self.rng);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::soul_tree::bloom::VISIBILITY_FLOOR;
	use crate::components::soul_tree::vitality::{NEUTRAL_GRAY, VITALITY_FLOOR, VITALITY_MAX};

	const W: f64 = 800.0;
	const H: f64 = 600.0;

	struct Block;

	impl TextRasterizer for Block {
		fn rasterize(&self, _text: &str, width: f64, height: f64) -> Vec<Point> {
			(0..20)
				.map(|i| Point::new(width / 4.0 + i as f64 * 4.0, height / 3.0))
				.collect()
		}
	}

	fn sim() -> Simulation {
		let config = SceneConfig {
			seed: Some(42),
			..SceneConfig::default()
		};
		Simulation::new(config, W, H, 0, Box::new(Block))
	}

	fn run(sim: &mut Simulation, frames: usize) {
		for _ in 0..frames {
			sim.advance_frame(0.016);
		}
	}

	#[test]
	fn test_hope_rocket_hangs_a_star() {
		let mut sim = sim();
		sim.submit("joy", "test");

		let p = &sim.state().projectiles.projectiles[0];
		assert_eq!(p.kind, ProjectileKind::Hope);
		assert!(p.target.y < 0.1 * H);
		assert_eq!(p.target.x, p.origin.x);

		run(&mut sim, 120);
		assert!(sim.state().projectiles.is_empty());
		assert_eq!(sim.state().mode.kind(), ModeKind::Hope);
		assert!(sim.state().mode.star().is_some());
		assert_eq!(sim.state().trunk_target(), GOLD);
		assert_eq!(sim.state().trunk_color(), GOLD);
	}

	#[test]
	fn test_repeated_rage_refreshes_without_second_mascot() {
		let mut sim = sim();
		sim.submit("anger", "");
		run(&mut sim, 80);
		assert_eq!(sim.state().mode.kind(), ModeKind::Rage);
		assert_eq!(sim.state().mode.rage().unwrap().text, "BREATHE");

		sim.submit("anger", "again");
		sim.submit("anger", "and again");
		let mut mascots = 0;
		for _ in 0..120 {
			sim.advance_frame(0.016);
			mascots = mascots.max(usize::from(
				sim.state().mode.rage().is_some_and(|r| r.mascot.is_some()),
			));
		}
		assert!(mascots <= 1);
		let duration = sim.state().mode.duration();
		assert!(sim.state().mode.timer() > duration - 120);
		// Refresh keeps the first overlay, text included.
		assert_eq!(sim.state().mode.rage().unwrap().text, "BREATHE");
	}

	#[test]
	fn test_wind_during_happy_clears_everything() {
		let mut sim = sim();
		for _ in 0..5 {
			sim.submit("love", "");
		}
		run(&mut sim, 100);
		assert_eq!(sim.state().blooms.attached_count(), 5);

		sim.state.mode.enter(Mode::Happy(HappyEffect { shake: HAPPY_SHAKE }));
		sim.trigger_wind();

		let state = sim.state();
		assert_eq!(state.mode.kind(), ModeKind::Normal);
		assert_eq!(state.mode.timer(), 0);
		assert_eq!(state.mode.overlay_objects(), 0);
		assert_eq!(state.vitality.vitality(), VITALITY_FLOOR);
		assert_eq!(state.vitality.color(), NEUTRAL_GRAY);
		assert_eq!(state.blooms.attached_count(), 0);
		assert!(state.blooms.blooms.iter().all(|b| b.detached()));

		run(&mut sim, 2000);
		assert!(sim.state().blooms.is_empty());
	}

	#[test]
	fn test_wind_during_rage_leaves_no_overlay() {
		let mut sim = sim();
		sim.submit("anger", "grr");
		run(&mut sim, 200);
		assert!(sim.state().mode.overlay_objects() > 0);
		sim.trigger_wind();
		assert_eq!(sim.state().mode.kind(), ModeKind::Normal);
		assert_eq!(sim.state().mode.overlay_objects(), 0);
	}

	#[test]
	fn test_resize_keeps_projectiles_and_retargets() {
		let mut sim = sim();
		sim.submit("love", "");
		run(&mut sim, 10);
		let before = sim.state().projectiles.projectiles[0].clone();

		sim.resize(400.0, 900.0);
		assert_eq!(sim.state().projectiles.len(), 1);
		assert_eq!(sim.state().projectiles.projectiles[0].target, before.target);
		assert_eq!(sim.state().branches[0].origin, Point::new(200.0, 900.0));

		sim.submit("calm", "");
		let new_target = sim.state().projectiles.projectiles[1].target;
		assert!(sim.state().branches.iter().any(|b| b.end == new_target));
		assert_eq!(sim.state().input_origin(), Point::new(200.0, 840.0));
	}

	#[test]
	fn test_two_normal_submissions_make_two_blooms() {
		let mut sim = sim();
		sim.submit("calm", "");
		sim.submit("calm", "");
		let targets: Vec<Point> = sim
			.state()
			.projectiles
			.projectiles
			.iter()
			.map(|p| p.target)
			.collect();
		run(&mut sim, 100);
		assert_eq!(sim.state().blooms.attached_count(), 2);
		for (bloom, target) in sim.state().blooms.blooms.iter().zip(targets) {
			assert_eq!(bloom.position, target);
			assert!(bloom.depth >= crate::components::soul_tree::tree::CANOPY_DEPTH);
		}
	}

	#[test]
	fn test_vitality_stays_clamped() {
		let mut sim = sim();
		for i in 0..100 {
			sim.submit(if i % 2 == 0 { "love" } else { "sad" }, "");
			assert!((0.0..=VITALITY_MAX).contains(&sim.state().vitality.vitality()));
		}
		assert_eq!(sim.state().vitality.vitality(), VITALITY_MAX);
	}

	#[test]
	fn test_unknown_mood_and_empty_text_still_fly() {
		let mut sim = sim();
		assert!(sim.submit("bewildered", "").is_none());
		assert_eq!(sim.state().projectiles.len(), 1);
		assert!(sim.state().vitality.vitality() > VITALITY_FLOOR);
	}

	#[test]
	fn test_empty_tree_targets_centre() {
		let mut sim = sim();
		sim.state.branches.clear();
		sim.state.tips.clear();
		sim.submit("love", "");
		assert_eq!(
			sim.state().projectiles.projectiles[0].target,
			Point::new(W / 2.0, H / 2.0)
		);
		run(&mut sim, 100);
		assert_eq!(sim.state().blooms.attached_count(), 1);
	}

	#[test]
	fn test_happy_entry_bursts_confetti_and_shakes() {
		let mut sim = sim();
		sim.submit("love", "");
		run(&mut sim, 100);
		sim.submit("excited", "");
		run(&mut sim, 91);

		let state = sim.state();
		assert_eq!(state.mode.kind(), ModeKind::Happy);
		assert!(state.mode.shake() > 0.0);
		assert_eq!(state.blooms.attached_count(), 0);
		assert!(state.blooms.len() > 1);
		assert!(state.blooms.blooms.iter().all(|b| b.size >= VISIBILITY_FLOOR));
	}

	#[test]
	fn test_mode_expires_back_to_normal() {
		let config = SceneConfig {
			seed: Some(3),
			mode_duration_frames: 30,
			..SceneConfig::default()
		};
		let mut sim = Simulation::new(config, W, H, 0, Box::new(Block));
		sim.submit("joy", "");
		run(&mut sim, 76);
		assert_eq!(sim.state().mode.kind(), ModeKind::Hope);
		run(&mut sim, 30);
		assert_eq!(sim.state().mode.kind(), ModeKind::Normal);
		assert!(sim.state().mode.star().is_none());
	}

	#[test]
	fn test_heavy_submissions_suggest_a_room() {
		let mut sim = sim();
		assert!(sim.submit("sad", "").is_none());
		assert!(sim.submit("anxious", "").is_none());
		let suggestion = sim.submit("sad", "").unwrap();
		assert_eq!(suggestion.target_room, "cafe");
	}
}
