//! Material system
//!
//! Materials are stored centrally in [`MaterialManager`] and referenced by
//! [`MaterialId`]. Several instances may share one material, so editing it
//! changes all of them at once.

use wgpu::Device;

use super::texture_resource::EnvironmentTextures;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Index of a material inside its [`MaterialManager`]
pub type MaterialId = usize;

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    /// 1.0 outputs `base_color` without shading
    pub unlit: f32,
    /// Highest mip level of the bound environment map
    pub max_lod: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout shared by every material bind group: uniform, environment cube, sampler
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl MaterialBindings {
    pub fn new(device: &Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_cube())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Material Bind Group Layout");

        MaterialBindings { bind_group_layout }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

struct MaterialGpu {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
    bound_environment: usize,
}

/// Surface appearance of one or more mesh instances
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    /// Skip lighting and reflections, output the base color
    pub unlit: bool,
    /// Draw triangle edges instead of filled triangles
    pub wireframe: bool,
    /// Environment map index reflected by this material
    pub environment: usize,

    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            unlit: false,
            wireframe: false,
            environment: 0,
            gpu: None,
        }
    }
}

impl Material {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Name for this material, made unique when added to a manager
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Flat colored material that ignores lighting
    pub fn unlit(name: &str, rgb: [f32; 3]) -> Self {
        Self {
            unlit: true,
            ..Self::new(name, [rgb[0], rgb[1], rgb[2], 1.0], 0.0, 1.0)
        }
    }

    /// Fully metallic mirror reflecting environment map `environment`
    pub fn metallic(name: &str, environment: usize) -> Self {
        Self {
            environment,
            ..Self::new(name, [1.0, 1.0, 1.0, 1.0], 1.0, 0.0)
        }
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set wireframe rendering
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Replaces the RGB part of the base color, keeping alpha
    pub fn set_rgb(&mut self, rgb: [f32; 3]) {
        self.base_color[..3].copy_from_slice(&rgb);
    }

    pub fn rgb(&self) -> [f32; 3] {
        [self.base_color[0], self.base_color[1], self.base_color[2]]
    }

    pub fn is_translucent(&self) -> bool {
        self.base_color[3] < 1.0
    }

    fn uniform(&self, max_lod: f32) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic.clamp(0.0, 1.0),
            roughness: self.roughness.clamp(0.0, 1.0),
            unlit: if self.unlit { 1.0 } else { 0.0 },
            max_lod,
        }
    }

    /// Syncs this material to the GPU
    ///
    /// Creates the uniform buffer and bind group on first use; afterwards only
    /// changed uniform contents are written.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        bindings: &MaterialBindings,
        environments: &EnvironmentTextures,
    ) {
        let environment = environments.get(self.environment);
        let max_lod = environment.texture.mip_level_count().saturating_sub(1) as f32;
        let uniform = self.uniform(max_lod);

        let needs_bind_group = self
            .gpu
            .as_ref()
            .is_none_or(|gpu| gpu.bound_environment != self.environment);

        if needs_bind_group {
            let ubo = MaterialUBO::new_with_data(device, &uniform);
            let bind_group = BindGroupBuilder::new(&bindings.bind_group_layout)
                .resource(ubo.binding_resource())
                .texture(&environment.view)
                .sampler(&environment.sampler)
                .create(device, &format!("Material Bind Group: {}", self.name));

            self.gpu = Some(MaterialGpu {
                ubo,
                bind_group,
                bound_environment: self.environment,
            });
        } else if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Manages all materials in the scene
pub struct MaterialManager {
    materials: Vec<Material>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
        }
    }

    /// Adds a material and returns its id
    ///
    /// The name is suffixed with a counter if it is already taken.
    pub fn add_material(&mut self, mut material: Material) -> MaterialId {
        material.name = self.ensure_unique_name(&material.name);
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<MaterialId> {
        self.materials.iter().position(|material| material.name == name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Syncs every material to the GPU
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        bindings: &MaterialBindings,
        environments: &EnvironmentTextures,
    ) {
        for material in &mut self.materials {
            material.update_gpu_resources(device, queue, bindings, environments);
        }
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.materials.iter().any(|material| material.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_get_suffixes() {
        let mut manager = MaterialManager::new();
        let a = manager.add_material(Material::metallic("glass", 0));
        let b = manager.add_material(Material::metallic("glass", 1));
        let c = manager.add_material(Material::metallic("glass", 2));

        assert_eq!(manager.get_material(a).unwrap().name, "glass");
        assert_eq!(manager.get_material(b).unwrap().name, "glass (1)");
        assert_eq!(manager.get_material(c).unwrap().name, "glass (2)");
        assert_eq!(manager.find_by_name("glass (1)"), Some(b));
    }

    #[test]
    fn test_set_rgb_keeps_alpha() {
        let mut material = Material::unlit("backdrop", [0.1, 0.2, 0.3]).with_alpha(0.5);
        material.set_rgb([1.0, 0.5, 0.0]);

        assert_eq!(material.base_color, [1.0, 0.5, 0.0, 0.5]);
        assert!(material.is_translucent());
    }

    #[test]
    fn test_uniform_reflects_flags() {
        let colored = Material::unlit("colored", [0.2, 0.4, 0.6]);
        let uniform = colored.uniform(0.0);
        assert_eq!(uniform.unlit, 1.0);
        assert_eq!(uniform.base_color, [0.2, 0.4, 0.6, 1.0]);

        let mirror = Material::metallic("text", 0);
        let uniform = mirror.uniform(9.0);
        assert_eq!(uniform.unlit, 0.0);
        assert_eq!(uniform.metallic, 1.0);
        assert_eq!(uniform.roughness, 0.0);
        assert_eq!(uniform.max_lod, 9.0);
    }
}
