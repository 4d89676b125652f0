//! # Showcase
//!
//! Scene-specific logic on top of the engine: random placement, one-shot scene
//! population and the parameters the panel edits.

pub mod params;
pub mod placement;
pub mod populator;

pub use params::{apply_color, parse_css_rgb, ColorError, ColorState, ParamRange, Parameters};
pub use placement::place_randomly;
pub use populator::{populate, populate_scene, SceneBindings};
