//! # Graphics Module
//!
//! Camera, geometry, rendering and scene management.
//!
//! - **Camera System** ([`camera`]) - Damped orbit camera plus the target animator
//! - **Geometry** ([`geometry`]) - Primitive and extruded-text mesh generation
//! - **Rendering Pipeline** ([`rendering`]) - Surface, wireframe and translucent passes
//! - **Scene Management** ([`scene`]) - Shared meshes and their placed instances
//! - **Resource Management** ([`resources`]) - Materials, environment maps and uniforms
//!
//! ## Usage
//!
//! ```no_run
//! use scenic::gfx::{camera::CameraManager, scene::Scene};
//! use scenic::config::SceneConfig;
//!
//! let config = SceneConfig::default();
//! let scene = Scene::new(CameraManager::from_config(&config.camera, 1.5));
//! assert_eq!(scene.get_object_count(), 0);
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
