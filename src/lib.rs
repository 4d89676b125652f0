//! scenic
//!
//! An interactive showcase scene built on wgpu and winit: a reflective extruded
//! text surrounded by randomly placed primitives, an animated orbit camera and a
//! Dear ImGui parameter panel.

pub mod app;
pub mod assets;
pub mod config;
pub mod gfx;
pub mod showcase;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::SceneApp;
pub use config::SceneConfig;
