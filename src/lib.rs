//! soul-tree: a generative tree that grows, blooms and changes mood with the
//! emotions fed to it.
//!
//! This crate provides a WASM-based canvas scene: a procedurally grown tree
//! whose vitality, colour and overlays respond to mood + message submissions.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::soul_tree::{
	Mood, SceneConfig, SoulTreeCanvas, Submission, Suggestion, SuggestionReason,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("soul-tree: logging initialized");
}

/// Load scene configuration from a script element with id="soul-tree-config".
/// Expected format: JSON with any subset of the [`SceneConfig`] fields.
fn load_scene_config() -> Option<SceneConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("soul-tree-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	let config = SceneConfig::from_json(&json_text);
	info!(
		"soul-tree: loaded config (mode duration {} frames, suggestion threshold {})",
		config.mode_duration_frames, config.suggestion_threshold
	);
	Some(config)
}

fn suggestion_text(s: &Suggestion) -> String {
	match s.reason {
		SuggestionReason::HeavyStreak => format!(
			"That's {} heavy moments in a row. Maybe take a break in the {}?",
			s.count, s.target_room
		),
		SuggestionReason::RepeatedMood => format!(
			"You've felt {} {} times now. The {} room might suit you.",
			s.mood_id, s.count, s.target_room
		),
	}
}

/// Main application component.
/// Loads the scene config from the DOM and renders the tree with its input bar.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_scene_config().unwrap_or_default();

	let (selected, set_selected) = signal(Mood::ALL[0].id);
	let (text, set_text) = signal(String::new());
	let (submission, set_submission) = signal(None::<Submission>);
	let (wind, set_wind) = signal(0u32);
	let (suggestion, set_suggestion) = signal(None::<Suggestion>);

	let on_suggest = Callback::new(move |s: Suggestion| set_suggestion.set(Some(s)));

	let feed = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let mood_id = selected.get_untracked().to_string();
		let message = text.get_untracked();
		set_submission.update(|prev| {
			let seq = prev.as_ref().map_or(1, |p| p.seq + 1);
			*prev = Some(Submission {
				seq,
				mood_id,
				text: message,
			});
		});
		set_text.set(String::new());
	};

	let mood_buttons = Mood::ALL
		.iter()
		.map(|mood| {
			let id = mood.id;
			view! {
				<button
					type="button"
					class="mood"
					class:selected=move || selected.get() == id
					on:click=move |_| set_selected.set(id)
				>
					{mood.label}
				</button>
			}
		})
		.collect_view();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Soul Tree" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-scene">
			<SoulTreeCanvas
				config=config
				submission=submission
				wind=wind
				on_suggest=on_suggest
			/>
			<div class="scene-overlay">
				<h1>"Soul Tree"</h1>
				<p class="subtitle">"Pick a mood, say a little, and feed the tree."</p>
			</div>
			<Show when=move || suggestion.get().is_some()>
				<div class="suggestion">
					<p>{move || suggestion.get().as_ref().map(suggestion_text)}</p>
					<button type="button" on:click=move |_| set_suggestion.set(None)>
						"Dismiss"
					</button>
				</div>
			</Show>
			<form class="input-bar" on:submit=feed>
				<div class="moods">{mood_buttons}</div>
				<input
					type="text"
					placeholder="How are you feeling?"
					prop:value=move || text.get()
					on:input=move |ev| set_text.set(event_target_value(&ev))
				/>
				<button type="submit" class="feed">"Feed"</button>
				<button type="button" class="wind" on:click=move |_| set_wind.update(|n| *n += 1)>
					"Wind"
				</button>
			</form>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_suggestion_text_names_the_room() {
		let s = Suggestion {
			target_room: "cafe",
			reason: SuggestionReason::HeavyStreak,
			mood_id: "sad".into(),
			count: 3,
		};
		assert!(suggestion_text(&s).contains("cafe"));
	}
}
