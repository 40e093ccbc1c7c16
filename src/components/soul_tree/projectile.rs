//! Message markers flying from the input bar to their destination.
//!
//! Every projectile follows a quadratic Bezier whose control point is the
//! midpoint of origin and target lifted by a fixed amount, which produces an
//! arc for canopy shots and a straight climb for rockets.

use super::theme::Rgb;
use super::types::{Point, ProjectileKind};

/// Vertical lift of the Bezier control point, in pixels.
pub const ARC_LIFT: f64 = 150.0;
/// Progress per frame for canopy shots (about 1.5 s at 60 fps).
pub const ARC_SPEED: f64 = 1.0 / 90.0;
/// Progress per frame for rockets.
pub const ROCKET_SPEED: f64 = 1.0 / 75.0;

/// Standard quadratic Bezier evaluation.
pub fn quadratic_bezier(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
	let u = 1.0 - t;
	Point::new(
		u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
		u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
	)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
	pub origin: Point,
	pub target: Point,
	pub color: Rgb,
	pub progress: f64,
	pub speed: f64,
	pub kind: ProjectileKind,
	/// Message carried along; rage uses it for the revealed text.
	pub text: String,
	/// Depth of the branch tip being aimed at (0 when not aiming at the tree).
	pub target_depth: u32,
}

impl Projectile {
	pub fn new(origin: Point, target: Point, color: Rgb, kind: ProjectileKind) -> Self {
		let speed = if kind.is_rocket() {
			ROCKET_SPEED
		} else {
			ARC_SPEED
		};
		Self {
			origin,
			target,
			color,
			progress: 0.0,
			speed,
			kind,
			text: String::new(),
			target_depth: 0,
		}
	}

	pub fn control_point(&self) -> Point {
		let mid = self.origin.lerp(self.target, 0.5);
		Point::new(mid.x, mid.y - ARC_LIFT)
	}

	pub fn position(&self) -> Point {
		self.position_at(self.progress)
	}

	pub fn position_at(&self, t: f64) -> Point {
		quadratic_bezier(self.origin, self.control_point(), self.target, t.clamp(0.0, 1.0))
	}

	pub fn arrived(&self) -> bool {
		self.progress >= 1.0
	}
}

/// A projectile that reached its target this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrival {
	pub kind: ProjectileKind,
	pub position: Point,
	pub color: Rgb,
	pub text: String,
	pub target_depth: u32,
}

/// All live projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileSystem {
	pub projectiles: Vec<Projectile>,
}

impl ProjectileSystem {
	/// Launch a projectile; the returned handle lets the caller attach a
	/// message or target depth before the next frame.
	pub fn enqueue(
		&mut self,
		origin: Point,
		target: Point,
		color: Rgb,
		kind: ProjectileKind,
	) -> &mut Projectile {
		let index = self.projectiles.len();
		self.projectiles
			.push(Projectile::new(origin, target, color, kind));
		&mut self.projectiles[index]
	}

	/// Advance one frame, removing arrived projectiles and reporting them in
	/// launch order. Each projectile arrives exactly once.
	pub fn tick(&mut self) -> Vec<Arrival> {
		let mut arrivals = Vec::new();
		self.projectiles.retain_mut(|p| {
			p.progress = (p.progress + p.speed).min(1.0);
			if p.arrived() {
				arrivals.push(Arrival {
					kind: p.kind,
					position: p.target,
					color: p.color,
					text: std::mem::take(&mut p.text),
					target_depth: p.target_depth,
				});
				false
			} else {
				true
			}
		});
		arrivals
	}

	pub fn len(&self) -> usize {
		self.projectiles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.projectiles.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WHITE: Rgb = Rgb::new(255.0, 255.0, 255.0);

	#[test]
	fn test_bezier_endpoints_and_apex() {
		let p = Projectile::new(
			Point::new(0.0, 500.0),
			Point::new(200.0, 500.0),
			WHITE,
			ProjectileKind::Normal,
		);
		assert_eq!(p.position_at(0.0), p.origin);
		assert_eq!(p.position_at(1.0), p.target);
		let mid = p.position_at(0.5);
		assert!((mid.x - 100.0).abs() < 1e-9);
		// Raised by half the control lift at t = 0.5.
		assert!((mid.y - (500.0 - ARC_LIFT / 2.0)).abs() < 1e-9);
	}

	#[test]
	fn test_rockets_climb_vertically() {
		let p = Projectile::new(
			Point::new(300.0, 540.0),
			Point::new(300.0, -300.0),
			WHITE,
			ProjectileKind::Rage,
		);
		assert_eq!(p.speed, ROCKET_SPEED);
		for i in 0..=10 {
			assert!((p.position_at(i as f64 / 10.0).x - 300.0).abs() < 1e-9);
		}
	}

	#[test]
	fn test_arrival_removes_and_reports_once() {
		let mut system = ProjectileSystem::default();
		let p = system.enqueue(
			Point::new(0.0, 0.0),
			Point::new(10.0, 10.0),
			WHITE,
			ProjectileKind::Hope,
		);
		p.text = "hi".into();
		p.target_depth = 7;
		let mut arrivals = Vec::new();
		for _ in 0..200 {
			arrivals.extend(system.tick());
		}
		assert!(system.is_empty());
		assert_eq!(arrivals.len(), 1);
		assert_eq!(arrivals[0].kind, ProjectileKind::Hope);
		assert_eq!(arrivals[0].position, Point::new(10.0, 10.0));
		assert_eq!(arrivals[0].text, "hi");
		assert_eq!(arrivals[0].target_depth, 7);
	}

	#[test]
	fn test_flight_takes_one_to_two_seconds() {
		for kind in [ProjectileKind::Normal, ProjectileKind::Rage] {
			let mut system = ProjectileSystem::default();
			system.enqueue(Point::default(), Point::new(1.0, 1.0), WHITE, kind);
			let mut frames = 0;
			while system.tick().is_empty() {
				frames += 1;
			}
			assert!((60..=120).contains(&(frames + 1)), "frames={frames}");
		}
	}

	#[test]
	fn test_progress_never_exceeds_one() {
		let mut system = ProjectileSystem::default();
		system.enqueue(Point::default(), Point::new(5.0, 5.0), WHITE, ProjectileKind::Normal);
		for _ in 0..45 {
			system.tick();
			for p in &system.projectiles {
				assert!((0.0..=1.0).contains(&p.progress));
			}
		}
	}
}
