//! Soul tree scene component.
//!
//! Renders a procedurally grown tree on an HTML canvas that reacts to moods:
//! - Each mood + message submission flies a glowing marker into the canopy,
//!   where it settles as a bloom, or up into the sky to trigger a mode
//! - Vitality and trunk tint drift with what has been submitted
//! - Rage, hope and happy modes layer their own overlays for a while
//! - A wind gust resets the tree and blows every bloom loose
//!
//! # Example
//!
//! ```ignore
//! use soul_tree::{SceneConfig, SoulTreeCanvas, Submission};
//!
//! let (submission, set_submission) = signal(None::<Submission>);
//! let (wind, set_wind) = signal(0u32);
//!
//! view! { <SoulTreeCanvas config=SceneConfig::default() submission=submission wind=wind /> }
//! ```

mod bloom;
mod component;
pub mod config;
mod mood;
mod particles;
mod projectile;
mod raster;
mod render;
mod state;
pub mod theme;
mod tracker;
mod tree;
mod types;
mod vitality;

pub use component::SoulTreeCanvas;
pub use config::SceneConfig;
pub use raster::{CanvasTextRasterizer, TextRasterizer};
pub use state::{Simulation, SimulationState};
pub use theme::SceneTheme;
pub use types::{Mood, MoodClass, ProjectileKind, Submission, Suggestion, SuggestionReason};
