//! Procedural branch skeleton and the sway applied to it when drawn.
//!
//! The skeleton is generated once per canvas size by recursive binary
//! splitting from the bottom centre of the viewport. It is never mutated
//! afterwards; motion is layered on top by [`Sway`] at render time.

use std::f64::consts::FRAC_PI_2;

use rand::Rng;

use super::types::{Point, Vector};

/// Deepest level a branch may have.
pub const MAX_DEPTH: u32 = 10;
/// Branches shorter than this are not emitted.
pub const MIN_LENGTH: f64 = 10.0;
/// Branches at or beyond this depth form the canopy.
pub const CANOPY_DEPTH: u32 = 6;

/// One straight segment of the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
	pub origin: Point,
	pub end: Point,
	pub depth: u32,
	pub width: f64,
	pub length: f64,
	/// Heading in radians (`-PI/2` points straight up).
	pub angle: f64,
	/// Index of the parent branch; `None` for the trunk.
	pub parent: Option<usize>,
}

/// Parameters controlling tree growth.
#[derive(Clone, Copy, Debug)]
pub struct GrowthParams {
	/// Trunk length as a fraction of the viewport height
	pub trunk_ratio: f64,
	/// Trunk width in pixels
	pub trunk_width: f64,
	/// Length multiplier per generation
	pub length_decay: f64,
	/// Width multiplier per generation
	pub width_decay: f64,
	/// Smallest angular offset between parent and child
	pub spread_min: f64,
	/// Random extra spread added on top of `spread_min`
	pub spread_jitter: f64,
}

impl Default for GrowthParams {
	fn default() -> Self {
		Self {
			trunk_ratio: 0.18,
			trunk_width: 10.0,
			length_decay: 0.75,
			width_decay: 0.7,
			spread_min: 0.3,
			spread_jitter: 0.2,
		}
	}
}

/// Builds branch lists for a given viewport.
pub struct TreeGenerator {
	pub params: GrowthParams,
}

impl TreeGenerator {
	pub fn new(params: GrowthParams) -> Self {
		Self { params }
	}

	/// Grow a fresh tree rooted at `(width/2, height)`.
	///
	/// Branches are returned in pre-order: every parent precedes its children.
	pub fn generate<R: Rng + ?Sized>(&self, width: f64, height: f64, rng: &mut R) -> Vec<Branch> {
		let mut branches = Vec::new();
		let root = Point::new(width / 2.0, height);
		self.grow(
			&mut branches,
			rng,
			root,
			-FRAC_PI_2,
			height * self.params.trunk_ratio,
			self.params.trunk_width,
			0,
			None,
		);
		branches
	}

	#[allow(clippy::too_many_arguments)]
	fn grow<R: Rng + ?Sized>(
		&self,
		out: &mut Vec<Branch>,
		rng: &mut R,
		origin: Point,
		angle: f64,
		length: f64,
		width: f64,
		depth: u32,
		parent: Option<usize>,
	) {
		if length < MIN_LENGTH || depth > MAX_DEPTH {
			return;
		}

		let end = origin + Vector::new(angle.cos(), angle.sin()) * length;
		let index = out.len();
		out.push(Branch {
			origin,
			end,
			depth,
			width,
			length,
			angle,
			parent,
		});

		let p = &self.params;
		let left = angle - (p.spread_min + rng.gen_range(0.0..1.0) * p.spread_jitter);
		let right = angle + (p.spread_min + rng.gen_range(0.0..1.0) * p.spread_jitter);
		let (child_len, child_width) = (length * p.length_decay, width * p.width_decay);

		self.grow(out, rng, end, left, child_len, child_width, depth + 1, Some(index));
		self.grow(out, rng, end, right, child_len, child_width, depth + 1, Some(index));
	}
}

impl Default for TreeGenerator {
	fn default() -> Self {
		Self::new(GrowthParams::default())
	}
}

/// Indices of branches in the outer canopy.
pub fn canopy_tips(branches: &[Branch]) -> Vec<usize> {
	branches
		.iter()
		.enumerate()
		.filter(|(_, b)| b.depth >= CANOPY_DEPTH)
		.map(|(i, _)| i)
		.collect()
}

/// Highest point of the tree (smallest y), if there is a tree at all.
pub fn crown(branches: &[Branch]) -> Option<Point> {
	branches
		.iter()
		.map(|b| b.end)
		.min_by(|a, b| a.y.total_cmp(&b.y))
}

/// Wind motion layered over the static skeleton.
///
/// Displacement is a function of a point and the depth of the branch whose
/// end sits at that point, so a child's origin (its parent's end) always moves
/// together with the parent.
#[derive(Clone, Copy, Debug)]
pub struct Sway {
	pub time: f64,
	/// Gentle sway at the outermost depth, in pixels
	pub amplitude: f64,
	/// Extra high-frequency shake, in pixels
	pub shake: f64,
}

impl Sway {
	pub fn offset(&self, at: Point, depth: u32) -> Vector {
		let reach = (depth as f64 + 1.0) / (MAX_DEPTH as f64 + 1.0);
		let phase = at.x * 0.01 + depth as f64 * 0.5;
		let mut dx = (self.time * 1.2 + phase).sin() * self.amplitude * reach;
		let mut dy = 0.0;
		if self.shake > 0.0 {
			dx += (self.time * 40.0 + phase * 1.7).sin() * self.shake * reach;
			dy += (self.time * 35.0 + phase * 2.3).cos() * self.shake * reach * 0.5;
		}
		Vector::new(dx, dy)
	}

	/// Drawn endpoints of a branch after sway.
	pub fn apply(&self, branch: &Branch) -> (Point, Point) {
		let origin = match branch.depth {
			0 => branch.origin,
			d => branch.origin + self.offset(branch.origin, d - 1),
		};
		let end = branch.end + self.offset(branch.end, branch.depth);
		(origin, end)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn tree(seed: u64) -> Vec<Branch> {
		let mut rng = SmallRng::seed_from_u64(seed);
		TreeGenerator::default().generate(800.0, 600.0, &mut rng)
	}

	#[test]
	fn test_trunk_starts_at_bottom_centre_pointing_up() {
		let branches = tree(1);
		let trunk = &branches[0];
		assert_eq!(trunk.origin, Point::new(400.0, 600.0));
		assert_eq!(trunk.depth, 0);
		assert!(trunk.parent.is_none());
		assert!((trunk.length - 0.18 * 600.0).abs() < 1e-9);
		assert!(trunk.end.y < trunk.origin.y);
		assert!((trunk.end.x - trunk.origin.x).abs() < 1e-9);
	}

	#[test]
	fn test_depth_bounded_and_increasing() {
		for seed in 0..8 {
			let branches = tree(seed);
			for b in &branches {
				assert!(b.depth <= MAX_DEPTH);
				if let Some(p) = b.parent {
					assert_eq!(b.depth, branches[p].depth + 1);
				}
			}
		}
	}

	#[test]
	fn test_width_and_length_decay() {
		let branches = tree(3);
		for b in branches.iter().skip(1) {
			let parent = &branches[b.parent.unwrap()];
			assert!((b.width - parent.width * 0.7).abs() < 1e-9);
			assert!((b.length - parent.length * 0.75).abs() < 1e-9);
			assert!(b.length >= MIN_LENGTH);
			assert_eq!(b.origin, parent.end);
		}
	}

	#[test]
	fn test_leaves_stop_exactly_where_growth_must_stop() {
		let branches = tree(5);
		let mut child_count = vec![0usize; branches.len()];
		for b in &branches {
			if let Some(p) = b.parent {
				child_count[p] += 1;
			}
		}
		for (b, &children) in branches.iter().zip(&child_count) {
			let next_len = b.length * 0.75;
			let must_stop = next_len < MIN_LENGTH || b.depth + 1 > MAX_DEPTH;
			if must_stop {
				assert_eq!(children, 0);
			} else {
				assert_eq!(children, 2);
			}
		}
	}

	#[test]
	fn test_children_spread_within_bounds() {
		let branches = tree(9);
		for b in branches.iter().skip(1) {
			let parent = &branches[b.parent.unwrap()];
			let delta = (b.angle - parent.angle).abs();
			assert!((0.3 - 1e-9..=0.5 + 1e-9).contains(&delta), "delta={delta}");
		}
	}

	#[test]
	fn test_tiny_viewport_yields_no_branches() {
		let mut rng = SmallRng::seed_from_u64(0);
		let branches = TreeGenerator::default().generate(40.0, 40.0, &mut rng);
		assert!(branches.is_empty());
		assert!(canopy_tips(&branches).is_empty());
		assert!(crown(&branches).is_none());
	}

	#[test]
	fn test_canopy_tips_are_deep() {
		let branches = tree(2);
		let tips = canopy_tips(&branches);
		assert!(!tips.is_empty());
		assert!(tips.iter().all(|&i| branches[i].depth >= CANOPY_DEPTH));
	}

	#[test]
	fn test_sway_keeps_joints_connected() {
		let branches = tree(4);
		let sway = Sway {
			time: 3.7,
			amplitude: 4.5,
			shake: 12.0,
		};
		for b in branches.iter().skip(1) {
			let parent = &branches[b.parent.unwrap()];
			let (origin, _) = sway.apply(b);
			let (_, parent_end) = sway.apply(parent);
			assert!(origin.distance(parent_end) < 1e-9);
		}
		let (root, _) = sway.apply(&branches[0]);
		assert_eq!(root, branches[0].origin);
	}
}
