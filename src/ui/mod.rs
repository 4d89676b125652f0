//! # User Interface Module
//!
//! Dear ImGui overlay for the scene.
//!
//! - [`UiManager`] - ImGui context, winit input forwarding and wgpu rendering
//! - [`panel`] - The "Parameters" window bound to camera, color and material state
//!
//! Input the panel wants is not forwarded to the orbit controller.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::parameters_panel;
