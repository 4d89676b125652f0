//! Scene population
//!
//! Builds the text mesh and the randomly scattered primitive groups once the
//! font has been delivered.

use rand::Rng;

use super::params::ColorState;
use super::placement::place_randomly;
use crate::assets::{draw_reflection_index, AssetError, VectorFont};
use crate::config::SceneConfig;
use crate::gfx::geometry::{generate_box, generate_sphere, generate_text, generate_torus, GeometryData};
use crate::gfx::resources::{Material, MaterialId};
use crate::gfx::scene::{MeshInstance, MeshKind, Scene};

/// Materials created by one population, as the panel needs them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneBindings {
    /// Metallic material of the text, edited by the metalness/roughness sliders
    pub text_material: MaterialId,
    /// Shared by every donut, box and sphere; edited by the color and wireframe fields
    pub colored_material: MaterialId,
    /// One per glass sphere
    pub glass_materials: Vec<MaterialId>,
    pub backdrop_material: Option<MaterialId>,
}

/// Tessellates the configured text and populates `scene` with fresh randomness
pub fn populate(
    scene: &mut Scene,
    font: &VectorFont,
    environment_count: usize,
    color: &ColorState,
    config: &SceneConfig,
) -> Result<SceneBindings, AssetError> {
    let text = generate_text(font, &config.text)?;
    Ok(populate_scene(
        scene,
        &text,
        environment_count,
        color,
        config,
        &mut rand::rng(),
    ))
}

/// Adds one text instance, `config.object_groups` primitive groups and the
/// optional backdrop to `scene`
///
/// Every call adds new geometry, materials and instances; nothing is reused
/// from earlier calls.
pub fn populate_scene<R: Rng + ?Sized>(
    scene: &mut Scene,
    text: &GeometryData,
    environment_count: usize,
    color: &ColorState,
    config: &SceneConfig,
    rng: &mut R,
) -> SceneBindings {
    let primitives = &config.primitives;

    // Text
    let text_geometry = scene.add_geometry(text);
    let text_material = scene.add_material(Material::metallic("text", 0));
    let mut text_instance = MeshInstance::new(MeshKind::Text, text_geometry, text_material);
    text_instance.name = config.text.content.clone();
    scene.add_instance(text_instance);

    // Shared primitive geometry
    let donut = scene.add_geometry(&generate_torus(
        primitives.torus_radius,
        primitives.torus_tube,
        primitives.torus_radial_segments,
        primitives.torus_tubular_segments,
    ));
    let cube = scene.add_geometry(&generate_box(
        primitives.box_size,
        primitives.box_size,
        primitives.box_size,
    ));
    let ball = scene.add_geometry(&generate_sphere(
        primitives.sphere_radius,
        primitives.sphere_segments,
        primitives.sphere_segments,
    ));

    let colored_material = scene.add_material(
        Material::unlit("colored", color.to_linear_rgb()).with_wireframe(true),
    );

    let mut glass_materials = Vec::with_capacity(config.object_groups);
    for group in 0..config.object_groups {
        for (kind, geometry) in [
            (MeshKind::Donut, donut),
            (MeshKind::Box, cube),
            (MeshKind::Sphere, ball),
        ] {
            let mut instance = MeshInstance::new(kind, geometry, colored_material);
            instance.name = format!("{} {}", kind.label(), group);
            place_randomly(rng, &mut instance);
            scene.add_instance(instance);
        }

        let environment = draw_reflection_index(rng, environment_count);
        let glass = scene.add_material(Material::metallic(&format!("glass {}", group), environment));
        glass_materials.push(glass);

        let mut instance = MeshInstance::new(MeshKind::GlassSphere, ball, glass);
        instance.name = format!("{} {}", MeshKind::GlassSphere.label(), group);
        place_randomly(rng, &mut instance);
        scene.add_instance(instance);
    }

    let backdrop_material = config.backdrop.enabled.then(|| {
        let backdrop = &config.backdrop;
        let geometry = scene.add_geometry(&generate_sphere(
            backdrop.radius,
            backdrop.segments,
            backdrop.segments,
        ));
        let material = scene.add_material(
            Material::unlit("backdrop", color.to_linear_rgb()).with_alpha(backdrop.opacity),
        );
        scene.add_instance(MeshInstance::new(MeshKind::Backdrop, geometry, material));
        material
    });

    log::info!(
        "Populated scene: {} groups, {} objects, {} materials in total",
        config.object_groups,
        scene.get_object_count(),
        scene.material_manager.len()
    );

    SceneBindings {
        text_material,
        colored_material,
        glass_materials,
        backdrop_material,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::gfx::camera::CameraManager;
    use rand::{rngs::StdRng, SeedableRng};

    const PRIMITIVES: [MeshKind; 4] = [
        MeshKind::Donut,
        MeshKind::Box,
        MeshKind::Sphere,
        MeshKind::GlassSphere,
    ];

    fn empty_scene() -> Scene {
        Scene::new(CameraManager::from_config(&CameraConfig::default(), 1.5))
    }

    fn text_stub() -> GeometryData {
        generate_box(2.0, 0.4, 0.2)
    }

    fn primitive_count(scene: &Scene) -> usize {
        PRIMITIVES.iter().map(|kind| scene.count_kind(*kind)).sum()
    }

    #[test]
    fn test_population_counts() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let config = SceneConfig::default();

        populate_scene(&mut scene, &text_stub(), 4, &ColorState::new(1, 2, 3), &config, &mut rng);

        assert_eq!(scene.count_kind(MeshKind::Text), 1);
        assert_eq!(primitive_count(&scene), 400);
        for kind in PRIMITIVES {
            assert_eq!(scene.count_kind(kind), 100);
        }
        assert_eq!(scene.count_kind(MeshKind::Backdrop), 1);
    }

    #[test]
    fn test_populating_twice_doubles_everything() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(2);
        let config = SceneConfig::default().with_backdrop(false);
        let color = ColorState::new(1, 2, 3);

        let first = populate_scene(&mut scene, &text_stub(), 4, &color, &config, &mut rng);
        let second = populate_scene(&mut scene, &text_stub(), 4, &color, &config, &mut rng);

        assert_eq!(scene.count_kind(MeshKind::Text), 2);
        assert_eq!(primitive_count(&scene), 800);
        assert_ne!(first.colored_material, second.colored_material);
        assert_eq!(scene.count_kind(MeshKind::Backdrop), 0);
    }

    #[test]
    fn test_colored_material_is_shared() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(3);
        let bindings = populate_scene(
            &mut scene,
            &text_stub(),
            4,
            &ColorState::new(1, 2, 3),
            &SceneConfig::default(),
            &mut rng,
        );

        for object in &scene.objects {
            match object.kind {
                MeshKind::Donut | MeshKind::Box | MeshKind::Sphere => {
                    assert_eq!(object.material, bindings.colored_material)
                }
                MeshKind::Text => assert_eq!(object.material, bindings.text_material),
                MeshKind::GlassSphere => assert!(bindings.glass_materials.contains(&object.material)),
                MeshKind::Backdrop => assert_eq!(Some(object.material), bindings.backdrop_material),
            }
        }

        let colored = scene.get_material(bindings.colored_material).unwrap();
        assert!(colored.wireframe);
        assert!(colored.unlit);

        let text = scene.get_material(bindings.text_material).unwrap();
        assert_eq!((text.metallic, text.roughness, text.environment), (1.0, 0.0, 0));
    }

    #[test]
    fn test_glass_spheres_never_reflect_last_map() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(4);
        let bindings = populate_scene(
            &mut scene,
            &text_stub(),
            4,
            &ColorState::new(1, 2, 3),
            &SceneConfig::default(),
            &mut rng,
        );

        assert_eq!(bindings.glass_materials.len(), 100);
        for id in &bindings.glass_materials {
            let glass = scene.get_material(*id).unwrap();
            assert!(glass.environment < 3);
            assert_eq!((glass.metallic, glass.roughness), (1.0, 0.0));
        }
    }

    #[test]
    fn test_backdrop_is_translucent() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(5);
        let bindings = populate_scene(
            &mut scene,
            &text_stub(),
            4,
            &ColorState::new(200, 100, 50),
            &SceneConfig::default(),
            &mut rng,
        );

        let backdrop = scene.get_material(bindings.backdrop_material.unwrap()).unwrap();
        assert_eq!(backdrop.base_color[3], 0.5);
        assert!(backdrop.is_translucent());
    }
}
