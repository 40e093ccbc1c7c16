//! Small lights that settle on canopy tips and, once blown loose, fall.
//!
//! A bloom is either attached (grows toward its maximum size, breathes in
//! place) or detached (integrates velocity under gravity and drag, shrinks,
//! and is culled once it leaves the viewport or fades out). Detachment is
//! one-way.

use std::f64::consts::TAU;

use rand::Rng;

use super::theme::Rgb;
use super::types::{Point, Vector};

const MIN_MAX_SIZE: f64 = 2.0;
const MAX_MAX_SIZE: f64 = 6.0;
const GROWTH_PER_FRAME: f64 = 0.05;
const GRAVITY: f64 = 0.05;
const DRAG: f64 = 0.98;
const SHRINK: f64 = 0.995;
const DOWNWARD_BIAS: f64 = 1.0;
/// Detached blooms smaller than this are removed.
pub const VISIBILITY_FLOOR: f64 = 0.3;
/// Margin outside the viewport before a falling bloom is culled.
const CULL_MARGIN: f64 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Bloom {
	pub position: Point,
	pub color: Rgb,
	pub size: f64,
	pub max_size: f64,
	pub phase: f64,
	pub velocity: Vector,
	/// Depth of the branch tip it sits on; drives how much it sways.
	pub depth: u32,
	detached: bool,
}

impl Bloom {
	pub fn detached(&self) -> bool {
		self.detached
	}

	/// Breathing brightness multiplier in `[0.2, 1.0]`.
	pub fn breath(&self, time: f64) -> f64 {
		0.6 + 0.4 * (time * 2.0 + self.phase).sin()
	}

	fn detach<R: Rng + ?Sized>(&mut self, center: Point, force: f64, rng: &mut R) {
		if self.detached {
			return;
		}
		self.detached = true;
		let mut away = (self.position - center).normalize();
		if away == Vector::ZERO {
			let a = rng.gen_range(0.0..TAU);
			away = Vector::new(a.cos(), a.sin());
		}
		self.velocity = away * (force * rng.gen_range(0.5..1.0)) + Vector::new(0.0, DOWNWARD_BIAS);
	}
}

/// All blooms in the scene.
#[derive(Clone, Debug)]
pub struct BloomField {
	pub blooms: Vec<Bloom>,
	width: f64,
	height: f64,
}

impl BloomField {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			blooms: Vec::new(),
			width,
			height,
		}
	}

	/// Place a new attached bloom at a canopy tip.
	pub fn spawn_attached<R: Rng + ?Sized>(&mut self, position: Point, color: Rgb, depth: u32, rng: &mut R) {
		self.blooms.push(Bloom {
			position,
			color,
			size: 0.0,
			max_size: rng.gen_range(MIN_MAX_SIZE..MAX_MAX_SIZE),
			phase: rng.gen_range(0.0..TAU),
			velocity: Vector::ZERO,
			depth,
			detached: false,
		});
	}

	/// Place a full-size bloom that is already falling (confetti).
	pub fn spawn_detached<R: Rng + ?Sized>(
		&mut self,
		position: Point,
		color: Rgb,
		center: Point,
		force: f64,
		rng: &mut R,
	) {
		let max_size = rng.gen_range(MIN_MAX_SIZE..MAX_MAX_SIZE);
		let mut bloom = Bloom {
			position,
			color,
			size: max_size,
			max_size,
			phase: rng.gen_range(0.0..TAU),
			velocity: Vector::ZERO,
			depth: 0,
			detached: false,
		};
		bloom.detach(center, force, rng);
		self.blooms.push(bloom);
	}

	/// Blow every attached bloom loose, radially away from `center`.
	pub fn detach_all<R: Rng + ?Sized>(&mut self, center: Point, force: f64, rng: &mut R) {
		for bloom in &mut self.blooms {
			bloom.detach(center, force, rng);
		}
	}

	/// Advance one frame.
	pub fn tick(&mut self) {
		let (w, h) = (self.width, self.height);
		self.blooms.retain_mut(|b| {
			if !b.detached {
				b.size = (b.size + GROWTH_PER_FRAME).min(b.max_size);
				return true;
			}
			b.velocity.y += GRAVITY;
			b.velocity = b.velocity * DRAG;
			b.position = b.position + b.velocity;
			b.size *= SHRINK;

			let inside = b.position.x >= -CULL_MARGIN
				&& b.position.x <= w + CULL_MARGIN
				&& b.position.y <= h + CULL_MARGIN;
			inside && b.size >= VISIBILITY_FLOOR
		});
	}

	/// New bounds for culling; attached blooms keep their coordinates.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn attached_count(&self) -> usize {
		self.blooms.iter().filter(|b| !b.detached).count()
	}

	pub fn len(&self) -> usize {
		self.blooms.len()
	}

	pub fn is_empty(&self) -> bool {
		self.blooms.is_empty()
	}
}
