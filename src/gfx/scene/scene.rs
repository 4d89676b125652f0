use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::CameraManager,
    geometry::GeometryData,
    rendering::render_engine::SceneResources,
    resources::material::{Material, MaterialId, MaterialManager},
};

use super::object::{GeometryId, Mesh, MeshInstance, MeshKind};

/// Main scene containing meshes, instances, materials, and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub meshes: Vec<Mesh>,
    pub objects: Vec<MeshInstance>,
    pub material_manager: MaterialManager,
}

impl Scene {
    /// Creates an empty scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            meshes: Vec::new(),
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    /// Updates the camera matrices
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    /// Registers geometry shared by any number of instances
    pub fn add_geometry(&mut self, data: &GeometryData) -> GeometryId {
        self.meshes.push(Mesh::new(data));
        self.meshes.len() - 1
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.material_manager.add_material(material)
    }

    /// Adds an instance and returns its index
    pub fn add_instance(&mut self, instance: MeshInstance) -> usize {
        debug_assert!(instance.geometry < self.meshes.len());
        debug_assert!(instance.material < self.material_manager.len());
        self.objects.push(instance);
        self.objects.len() - 1
    }

    pub fn mesh(&self, id: GeometryId) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.material_manager.get_material(id)
    }

    pub fn get_material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.material_manager.get_material_mut(id)
    }

    /// Number of instances of one kind
    pub fn count_kind(&self, kind: MeshKind) -> usize {
        self.objects.iter().filter(|obj| obj.kind == kind).count()
    }

    /// Gets the total number of objects
    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    /// Creates GPU resources for everything added since the last call and
    /// syncs material uniforms
    ///
    /// Safe to call every frame: existing buffers are reused and unchanged
    /// uniforms are not rewritten.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        resources: &SceneResources,
    ) {
        for (index, mesh) in self.meshes.iter_mut().enumerate() {
            mesh.init_gpu_resources(device, &format!("Geometry {}", index));
        }

        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device, &resources.transform_layout);
        }

        self.material_manager.update_all_gpu_resources(
            device,
            queue,
            &resources.material_bindings,
            &resources.environments,
        );
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let total_triangles: u32 = self
            .objects
            .iter()
            .filter_map(|obj| self.meshes.get(obj.geometry))
            .map(|mesh| mesh.triangle_count())
            .sum();

        SceneStatistics {
            object_count: self.objects.len(),
            geometry_count: self.meshes.len(),
            material_count: self.material_manager.len(),
            total_triangles,
        }
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub geometry_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::gfx::geometry::generate_box;

    #[test]
    fn test_instances_share_geometry() {
        let mut scene = Scene::new(CameraManager::from_config(&CameraConfig::default(), 1.0));
        let geometry = scene.add_geometry(&generate_box(0.5, 0.5, 0.5));
        let material = scene.add_material(Material::unlit("colored", [1.0, 0.0, 0.0]));

        for _ in 0..3 {
            scene.add_instance(MeshInstance::new(MeshKind::Box, geometry, material));
        }

        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 3);
        assert_eq!(stats.geometry_count, 1);
        assert_eq!(stats.material_count, 1);
        assert_eq!(stats.total_triangles, 36);
        assert_eq!(scene.count_kind(MeshKind::Box), 3);
        assert_eq!(scene.count_kind(MeshKind::Text), 0);
    }
}
