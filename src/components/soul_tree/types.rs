//! Core value types shared by the simulation: geometry, moods and the events
//! that flow in from (and out to) the surrounding application.

use std::ops::{Add, Mul, Sub};

use super::theme::Rgb;

/// A position in canvas space (pixels, y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		(other - self).length()
	}

	pub fn lerp(self, other: Point, t: f64) -> Point {
		Point::new(
			self.x + (other.x - self.x) * t,
			self.y + (other.y - self.y) * t,
		)
	}
}

/// A displacement or velocity in canvas space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
	pub x: f64,
	pub y: f64,
}

impl Vector {
	pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	/// Unit vector in the same direction, or zero for degenerate input.
	pub fn normalize(self) -> Vector {
		let len = self.length();
		if len < 1e-9 {
			Vector::ZERO
		} else {
			Vector::new(self.x / len, self.y / len)
		}
	}
}

impl Add<Vector> for Point {
	type Output = Point;
	fn add(self, v: Vector) -> Point {
		Point::new(self.x + v.x, self.y + v.y)
	}
}

impl Sub for Point {
	type Output = Vector;
	fn sub(self, other: Point) -> Vector {
		Vector::new(self.x - other.x, self.y - other.y)
	}
}

impl Add for Vector {
	type Output = Vector;
	fn add(self, other: Vector) -> Vector {
		Vector::new(self.x + other.x, self.y + other.y)
	}
}

impl Mul<f64> for Vector {
	type Output = Vector;
	fn mul(self, s: f64) -> Vector {
		Vector::new(self.x * s, self.y * s)
	}
}

/// Whether a mood nourishes the tree or weighs on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoodClass {
	Good,
	Heavy,
}

/// Behaviour tag carried by a projectile; decides what its arrival does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
	Normal,
	Rage,
	Hope,
	Happy,
}

impl ProjectileKind {
	/// Rockets fly straight up; everything else arcs into the canopy.
	pub fn is_rocket(self) -> bool {
		matches!(self, ProjectileKind::Rage | ProjectileKind::Hope)
	}
}

/// A selectable emotion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mood {
	pub id: &'static str,
	pub label: &'static str,
	pub class: MoodClass,
	pub kind: ProjectileKind,
	pub color: Rgb,
}

impl Mood {
	/// Every mood offered by the input bar, in display order.
	pub const ALL: [Mood; 7] = [
		Mood {
			id: "love",
			label: "Love",
			class: MoodClass::Good,
			kind: ProjectileKind::Normal,
			color: Rgb::new(255.0, 120.0, 170.0),
		},
		Mood {
			id: "calm",
			label: "Calm",
			class: MoodClass::Good,
			kind: ProjectileKind::Normal,
			color: Rgb::new(120.0, 210.0, 200.0),
		},
		Mood {
			id: "joy",
			label: "Joy",
			class: MoodClass::Good,
			kind: ProjectileKind::Hope,
			color: Rgb::new(255.0, 215.0, 90.0),
		},
		Mood {
			id: "excited",
			label: "Excited",
			class: MoodClass::Good,
			kind: ProjectileKind::Happy,
			color: Rgb::new(255.0, 160.0, 60.0),
		},
		Mood {
			id: "sad",
			label: "Sad",
			class: MoodClass::Heavy,
			kind: ProjectileKind::Normal,
			color: Rgb::new(90.0, 130.0, 220.0),
		},
		Mood {
			id: "anxious",
			label: "Anxious",
			class: MoodClass::Heavy,
			kind: ProjectileKind::Normal,
			color: Rgb::new(160.0, 110.0, 210.0),
		},
		Mood {
			id: "anger",
			label: "Anger",
			class: MoodClass::Heavy,
			kind: ProjectileKind::Rage,
			color: Rgb::new(230.0, 60.0, 50.0),
		},
	];

	/// Fallback for ids the table does not know.
	pub const NEUTRAL: Mood = Mood {
		id: "neutral",
		label: "Neutral",
		class: MoodClass::Heavy,
		kind: ProjectileKind::Normal,
		color: Rgb::new(150.0, 150.0, 160.0),
	};

	/// Look up a mood by id (case-insensitive, surrounding whitespace ignored).
	pub fn find(id: &str) -> Option<Mood> {
		let id = id.trim();
		Self::ALL
			.iter()
			.find(|m| m.id.eq_ignore_ascii_case(id))
			.copied()
	}

	/// Like [`Mood::find`] but never fails.
	pub fn resolve(id: &str) -> Mood {
		Self::find(id).unwrap_or_else(|| {
			log::warn!("soul-tree: unknown mood {id:?}, using neutral");
			Self::NEUTRAL
		})
	}
}

/// A mood + message event from the input bar.
///
/// `seq` distinguishes two otherwise identical submissions so reactive
/// plumbing never coalesces them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Submission {
	pub seq: u64,
	pub mood_id: String,
	pub text: String,
}

/// Why the tracker is suggesting a change of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionReason {
	HeavyStreak,
	RepeatedMood,
}

/// Outbound navigation request; acting on it is left to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
	pub target_room: &'static str,
	pub reason: SuggestionReason,
	pub mood_id: String,
	pub count: u32,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_find_is_case_insensitive() {
		assert_eq!(Mood::find("  JOY ").map(|m| m.id), Some("joy"));
		assert_eq!(Mood::find("Anger").map(|m| m.kind), Some(ProjectileKind::Rage));
	}

	#[test]
	fn test_resolve_unknown_falls_back_to_neutral() {
		let mood = Mood::resolve("bewildered");
		assert_eq!(mood.id, "neutral");
		assert_eq!(mood.kind, ProjectileKind::Normal);
		assert_eq!(Mood::resolve("").id, "neutral");
	}

	#[test]
	fn test_mood_ids_are_unique() {
		for (i, a) in Mood::ALL.iter().enumerate() {
			for b in &Mood::ALL[i + 1..] {
				assert_ne!(a.id, b.id);
			}
		}
	}

	#[test]
	fn test_vector_normalize_degenerate() {
		assert_eq!(Vector::ZERO.normalize(), Vector::ZERO);
		let v = Vector::new(3.0, 4.0).normalize();
		assert!((v.length() - 1.0).abs() < 1e-12);
	}

	#[test]
	fn test_rocket_kinds() {
		assert!(ProjectileKind::Rage.is_rocket());
		assert!(ProjectileKind::Hope.is_rocket());
		assert!(!ProjectileKind::Happy.is_rocket());
		assert!(!ProjectileKind::Normal.is_rocket());
	}
}
