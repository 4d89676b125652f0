//! Scene configuration
//!
//! Every tunable constant of the showcase lives in [`SceneConfig`]. Defaults
//! reproduce the stock scene; a handful of fields can be overridden through
//! environment variables (see [`SceneConfig::from_env`]).

use std::path::{Path, PathBuf};

use cgmath::Vector3;

/// Asset root directory override
pub const ENV_ASSETS: &str = "SCENIC_ASSETS";
/// Displayed text override
pub const ENV_TEXT: &str = "SCENIC_TEXT";
/// Number of primitive groups override
pub const ENV_OBJECTS: &str = "SCENIC_OBJECTS";

/// Cube map face file names, in wgpu layer order (+X, -X, +Y, -Y, +Z, -Z)
pub const CUBE_FACE_NAMES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

/// Location of every file the scene loads
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub font: PathBuf,
    /// One directory per environment map, each holding six `<face>.png` files
    pub environment_maps: Vec<PathBuf>,
}

impl AssetPaths {
    /// Standard layout below `root`
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            font: root.join("fonts").join("helvetiker_regular.ttf"),
            environment_maps: (0..4)
                .map(|i| root.join("textures").join("environmentMaps").join(i.to_string()))
                .collect(),
            root,
        }
    }

    /// The six face files of one environment map directory
    pub fn cube_faces(dir: &Path) -> [PathBuf; 6] {
        CUBE_FACE_NAMES.map(|face| dir.join(format!("{face}.png")))
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::under("assets")
    }
}

/// Extruded text parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TextConfig {
    pub content: String,
    /// Glyph em height in world units
    pub size: f32,
    /// Extrusion depth along Z
    pub depth: f32,
    /// Segments used to approximate each curve; converted to a flattening tolerance
    pub curve_segments: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: "Yanick Christen".to_string(),
            size: 0.4,
            depth: 0.2,
            curve_segments: 6,
        }
    }
}

/// Primitive geometry parameters shared by every placed instance
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveConfig {
    pub torus_radius: f32,
    pub torus_tube: f32,
    pub torus_radial_segments: u32,
    pub torus_tubular_segments: u32,
    pub box_size: f32,
    pub sphere_radius: f32,
    pub sphere_segments: u32,
}

impl Default for PrimitiveConfig {
    fn default() -> Self {
        Self {
            torus_radius: 0.3,
            torus_tube: 0.2,
            torus_radial_segments: 20,
            torus_tubular_segments: 45,
            box_size: 0.5,
            sphere_radius: 0.25,
            sphere_segments: 32,
        }
    }
}

/// Translucent sphere enclosing the scene
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropConfig {
    pub enabled: bool,
    pub radius: f32,
    pub segments: u32,
    pub opacity: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 8.0,
            segments: 64,
            opacity: 0.5,
        }
    }
}

/// Perspective camera and orbit controller settings
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    pub initial_position: Vector3<f32>,
    pub orbit_target: Vector3<f32>,
    /// Fraction of pending orbit motion applied per frame
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            znear: 0.1,
            zfar: 100.0,
            initial_position: Vector3::new(1.0, 1.0, 2.0),
            orbit_target: Vector3::new(0.0, 0.0, 0.0),
            damping_factor: 0.05,
        }
    }
}

/// Top-level configuration of the showcase
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub window_title: String,
    pub window_size: (u32, u32),
    pub clear_color: [f64; 4],
    /// Number of (donut, box, sphere, glass sphere) groups
    pub object_groups: usize,
    pub assets: AssetPaths,
    pub text: TextConfig,
    pub primitives: PrimitiveConfig,
    pub backdrop: BackdropConfig,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_title: "scenic".to_string(),
            window_size: (1200, 800),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            object_groups: 100,
            assets: AssetPaths::default(),
            text: TextConfig::default(),
            primitives: PrimitiveConfig::default(),
            backdrop: BackdropConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Default configuration with environment variable overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup
    ///
    /// Unparseable values are logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_ASSETS) {
            self.assets = AssetPaths::under(root);
        }
        if let Some(text) = lookup(ENV_TEXT) {
            self.text.content = text;
        }
        if let Some(groups) = lookup(ENV_OBJECTS) {
            match groups.trim().parse::<usize>() {
                Ok(count) => self.object_groups = count,
                Err(err) => log::warn!("Ignoring {}={:?}: {}", ENV_OBJECTS, groups, err),
            }
        }
        self
    }

    pub fn with_assets(mut self, assets: AssetPaths) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_text(mut self, content: &str) -> Self {
        self.text.content = content.to_string();
        self
    }

    pub fn with_object_groups(mut self, groups: usize) -> Self {
        self.object_groups = groups;
        self
    }

    pub fn with_backdrop(mut self, enabled: bool) -> Self {
        self.backdrop.enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_stock_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.object_groups, 100);
        assert_eq!(config.camera.initial_position, Vector3::new(1.0, 1.0, 2.0));
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.assets.environment_maps.len(), 4);
        assert_eq!(config.text.curve_segments, 6);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_ASSETS, "/srv/scene"),
            (ENV_TEXT, "Hello"),
            (ENV_OBJECTS, "12"),
        ]
        .into_iter()
        .collect();

        let config =
            SceneConfig::default().with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.assets.root, PathBuf::from("/srv/scene"));
        assert_eq!(
            config.assets.font,
            PathBuf::from("/srv/scene/fonts/helvetiker_regular.ttf")
        );
        assert_eq!(config.text.content, "Hello");
        assert_eq!(config.object_groups, 12);
    }

    #[test]
    fn test_bad_object_count_is_ignored() {
        let config = SceneConfig::default()
            .with_overrides(|key| (key == ENV_OBJECTS).then(|| "lots".to_string()));
        assert_eq!(config.object_groups, 100);
    }

    #[test]
    fn test_builders_override_single_fields() {
        let config = SceneConfig::default()
            .with_assets(AssetPaths::under("/tmp/scene"))
            .with_text("Rust")
            .with_object_groups(3)
            .with_backdrop(false);

        assert_eq!(config.assets.root, PathBuf::from("/tmp/scene"));
        assert_eq!(config.text.content, "Rust");
        assert_eq!(config.object_groups, 3);
        assert!(!config.backdrop.enabled);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_cube_faces_follow_layer_order() {
        let faces = AssetPaths::cube_faces(Path::new("maps/2"));
        assert_eq!(faces[0], PathBuf::from("maps/2/px.png"));
        assert_eq!(faces[5], PathBuf::from("maps/2/nz.png"));
    }
}
