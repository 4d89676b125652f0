//! # Scene Management Module
//!
//! Containers for everything the renderer draws.
//!
//! ## Key Components
//!
//! - [`Scene`] - Meshes, instances, materials and the camera
//! - [`Mesh`] - Geometry uploaded once and shared by instances
//! - [`MeshInstance`] - A placed copy of a mesh with its own transform and a material id
//! - [`Vertex3D`] - GPU vertex format
//!
//! ```
//! use scenic::config::CameraConfig;
//! use scenic::gfx::camera::CameraManager;
//! use scenic::gfx::geometry::generate_sphere;
//! use scenic::gfx::resources::Material;
//! use scenic::gfx::scene::{MeshInstance, MeshKind, Scene};
//!
//! let mut scene = Scene::new(CameraManager::from_config(&CameraConfig::default(), 1.5));
//! let ball = scene.add_geometry(&generate_sphere(0.25, 32, 32));
//! let mirror = scene.add_material(Material::metallic("mirror", 0));
//! scene.add_instance(MeshInstance::new(MeshKind::GlassSphere, ball, mirror));
//! assert_eq!(scene.count_kind(MeshKind::GlassSphere), 1);
//! ```

pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use object::{DrawObject, GeometryId, Mesh, MeshInstance, MeshKind, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
