//! Short-lived particle effects used by the rage overlay.

use std::f64::consts::TAU;

use rand::Rng;

use super::types::{Point, Vector};

/// Frames a trail spark lives.
pub const SPARK_LIFE: u32 = 30;
/// Fraction of the remaining distance a glyph particle covers each frame.
const STEER: f64 = 0.08;

/// A single trail spark.
#[derive(Clone, Debug)]
pub struct Spark {
	pub position: Point,
	pub velocity: Vector,
	pub size: f64,
	pub life: u32,
}

impl Spark {
	/// Opacity fading linearly to zero over the spark's life.
	pub fn alpha(&self) -> f64 {
		self.life as f64 / SPARK_LIFE as f64
	}
}

/// Sparks left behind the flying mascot.
#[derive(Clone, Debug, Default)]
pub struct SparkTrail {
	pub sparks: Vec<Spark>,
}

impl SparkTrail {
	pub fn emit<R: Rng + ?Sized>(&mut self, at: Point, count: usize, rng: &mut R) {
		for _ in 0..count {
			let angle = rng.gen_range(0.0..TAU);
			let speed = rng.gen_range(0.3..1.5);
			self.sparks.push(Spark {
				position: at,
				velocity: Vector::new(angle.cos() * speed, angle.sin() * speed),
				size: rng.gen_range(1.0..3.0),
				life: SPARK_LIFE,
			});
		}
	}

	pub fn update(&mut self) {
		self.sparks.retain_mut(|s| {
			s.position = s.position + s.velocity;
			s.life = s.life.saturating_sub(1);
			s.life > 0
		});
	}

	pub fn len(&self) -> usize {
		self.sparks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sparks.is_empty()
	}
}

/// A particle steered toward one sampled pixel of the rage text.
#[derive(Clone, Debug)]
pub struct GlyphParticle {
	pub position: Point,
	pub target: Point,
	pub size: f64,
	/// For twinkling
	pub phase: f64,
}

impl GlyphParticle {
	pub fn settled(&self) -> bool {
		self.position.distance(self.target) < 0.5
	}

	pub fn twinkle_alpha(&self, time: f64) -> f64 {
		((time * 1.5 + self.phase).sin() * 0.5 + 0.5) * 0.4 + 0.6
	}
}

/// Progressive reveal of a text shape: pending target points are released a
/// batch per frame and each released particle eases toward its target.
#[derive(Clone, Debug, Default)]
pub struct GlyphReveal {
	pending: Vec<Point>,
	pub particles: Vec<GlyphParticle>,
	release_per_frame: usize,
}

impl GlyphReveal {
	/// `targets` should already be shuffled; release order follows it.
	pub fn new(mut targets: Vec<Point>, release_per_frame: usize) -> Self {
		// Release from the back with `pop`, so reverse to keep the given order.
		targets.reverse();
		Self {
			pending: targets,
			particles: Vec::new(),
			release_per_frame: release_per_frame.max(1),
		}
	}

	pub fn update<R: Rng + ?Sized>(&mut self, source: Point, rng: &mut R) {
		for _ in 0..self.release_per_frame {
			let Some(target) = self.pending.pop() else {
				break;
			};
			let jitter = Vector::new(rng.gen_range(-30.0..30.0), rng.gen_range(-30.0..30.0));
			self.particles.push(GlyphParticle {
				position: source + jitter,
				target,
				size: rng.gen_range(1.0..2.2),
				phase: rng.gen_range(0.0..TAU),
			});
		}

		for p in &mut self.particles {
			p.position = p.position + (p.target - p.position) * STEER;
		}
	}

	pub fn pending(&self) -> usize {
		self.pending.len()
	}

	pub fn is_complete(&self) -> bool {
		self.pending.is_empty() && self.particles.iter().all(GlyphParticle::settled)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn test_sparks_expire() {
		let mut rng = SmallRng::seed_from_u64(2);
		let mut trail = SparkTrail::default();
		trail.emit(Point::new(10.0, 10.0), 4, &mut rng);
		assert_eq!(trail.len(), 4);
		for _ in 0..SPARK_LIFE {
			trail.update();
		}
		assert!(trail.is_empty());
	}

	#[test]
	fn test_reveal_is_progressive_in_given_order() {
		let mut rng = SmallRng::seed_from_u64(4);
		let targets: Vec<Point> = (0..10).map(|i| Point::new(i as f64, 0.0)).collect();
		let mut reveal = GlyphReveal::new(targets, 3);
		reveal.update(Point::new(500.0, 500.0), &mut rng);
		assert_eq!(reveal.particles.len(), 3);
		assert_eq!(reveal.pending(), 7);
		let released: Vec<f64> = reveal.particles.iter().map(|p| p.target.x).collect();
		assert_eq!(released, vec![0.0, 1.0, 2.0]);
	}

	#[test]
	fn test_particles_converge_on_targets() {
		let mut rng = SmallRng::seed_from_u64(6);
		let targets = vec![Point::new(100.0, 100.0), Point::new(120.0, 90.0)];
		let mut reveal = GlyphReveal::new(targets, 8);
		for _ in 0..200 {
			reveal.update(Point::new(700.0, 300.0), &mut rng);
		}
		assert!(reveal.is_complete());
	}

	#[test]
	fn test_empty_reveal_is_complete() {
		let reveal = GlyphReveal::new(Vec::new(), 24);
		assert!(reveal.is_complete());
	}
}
