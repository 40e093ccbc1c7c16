//! Scene configuration, supplied by the host page as JSON.

use serde::Deserialize;

/// Tunable parameters of the scene. Every field has a default so a partial
/// (or absent) JSON document is valid.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
	/// Text revealed by glyph particles when rage is entered with an empty message.
	pub rage_text: String,
	/// How long a non-normal mode lasts, in frames.
	pub mode_duration_frames: u32,
	/// Heavy submissions (or same-mood repeats) before a view change is suggested.
	pub suggestion_threshold: u32,
	/// Blooms released at once when happy mode is entered.
	pub happy_burst: usize,
	/// Passive vitality loss per frame (never below the floor).
	pub vitality_decay: f64,
	/// Fixed RNG seed; the clock is used when absent.
	pub seed: Option<u64>,
}

impl Default for SceneConfig {
	fn default() -> Self {
		Self {
			rage_text: "BREATHE".to_string(),
			mode_duration_frames: 1200,
			suggestion_threshold: 3,
			happy_burst: 40,
			vitality_decay: 0.0,
			seed: None,
		}
	}
}

impl SceneConfig {
	/// Parse a JSON document, falling back to defaults on malformed input.
	pub fn from_json(json: &str) -> Self {
		match serde_json::from_str::<SceneConfig>(json) {
			Ok(config) => config,
			Err(e) => {
				log::warn!("soul-tree: failed to parse scene config: {}", e);
				Self::default()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_partial_json_keeps_defaults() {
		let config = SceneConfig::from_json(r#"{ "rageText": "LET GO", "seed": 7 }"#);
		assert_eq!(config.rage_text, "LET GO");
		assert_eq!(config.seed, Some(7));
		assert_eq!(config.mode_duration_frames, 1200);
		assert_eq!(config.suggestion_threshold, 3);
	}

	#[test]
	fn test_malformed_json_uses_defaults() {
		assert_eq!(SceneConfig::from_json("{ nope"), SceneConfig::default());
	}

	#[test]
	fn test_empty_object_is_default() {
		assert_eq!(SceneConfig::from_json("{}"), SceneConfig::default());
	}
}
