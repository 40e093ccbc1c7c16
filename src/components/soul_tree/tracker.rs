//! Submission tracking behind the "maybe visit another room" suggestion.

use super::types::{Mood, MoodClass, Suggestion, SuggestionReason};

/// Room suggested after a run of heavy moods.
pub const HEAVY_ROOM: &str = "cafe";
/// Room suggested after the same mood is repeated.
pub const REPEAT_ROOM: &str = "audio";

/// Counts heavy submissions and same-mood streaks; fires a [`Suggestion`] once
/// either reaches the threshold, then starts over.
#[derive(Clone, Debug)]
pub struct SubmissionTracker {
	threshold: u32,
	heavy_count: u32,
	last_mood: Option<&'static str>,
	streak: u32,
}

impl SubmissionTracker {
	pub fn new(threshold: u32) -> Self {
		Self {
			threshold: threshold.max(1),
			heavy_count: 0,
			last_mood: None,
			streak: 0,
		}
	}

	pub fn record(&mut self, mood: &Mood) -> Option<Suggestion> {
		if mood.class == MoodClass::Heavy {
			self.heavy_count += 1;
		}
		if self.last_mood == Some(mood.id) {
			self.streak += 1;
		} else {
			self.last_mood = Some(mood.id);
			self.streak = 1;
		}

		let suggestion = if self.heavy_count >= self.threshold {
			Some(Suggestion {
				target_room: HEAVY_ROOM,
				reason: SuggestionReason::HeavyStreak,
				mood_id: mood.id.to_string(),
				count: self.heavy_count,
			})
		} else if self.streak >= self.threshold {
			Some(Suggestion {
				target_room: REPEAT_ROOM,
				reason: SuggestionReason::RepeatedMood,
				mood_id: mood.id.to_string(),
				count: self.streak,
			})
		} else {
			None
		};

		if suggestion.is_some() {
			self.reset();
		}
		suggestion
	}

	pub fn reset(&mut self) {
		self.heavy_count = 0;
		self.last_mood = None;
		self.streak = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn mood(id: &str) -> Mood {
		Mood::find(id).unwrap()
	}

	#[test]
	fn test_heavy_run_suggests_cafe() {
		let mut tracker = SubmissionTracker::new(3);
		assert!(tracker.record(&mood("sad")).is_none());
		assert!(tracker.record(&mood("anxious")).is_none());
		let s = tracker.record(&mood("anger")).unwrap();
		assert_eq!(s.target_room, HEAVY_ROOM);
		assert_eq!(s.reason, SuggestionReason::HeavyStreak);
		assert_eq!(s.count, 3);
		assert_eq!(tracker.heavy_count, 0);
	}

	#[test]
	fn test_repeated_good_mood_suggests_audio() {
		let mut tracker = SubmissionTracker::new(3);
		tracker.record(&mood("love"));
		tracker.record(&mood("love"));
		let s = tracker.record(&mood("love")).unwrap();
		assert_eq!(s.reason, SuggestionReason::RepeatedMood);
		assert_eq!(s.target_room, REPEAT_ROOM);
		assert_eq!(s.mood_id, "love");
	}

	#[test]
	fn test_streak_broken_by_other_mood() {
		let mut tracker = SubmissionTracker::new(3);
		tracker.record(&mood("love"));
		tracker.record(&mood("love"));
		assert!(tracker.record(&mood("calm")).is_none());
		assert_eq!(tracker.streak, 1);
	}
}
