//! Meshes and the instances that place them in the scene
//!
//! A [`Mesh`] owns the vertex, index and edge buffers of one geometry and is
//! shared by every [`MeshInstance`] that draws it. Instances carry their own
//! transform uniform and reference a material by id.

use cgmath::{Matrix4, Rad, Vector3};
use wgpu::util::DeviceExt;
use wgpu::Device;

use super::vertex::Vertex3D;
use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::MaterialId;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

/// Index of a mesh inside its scene
pub type GeometryId = usize;

/// What an instance depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Text,
    Donut,
    Box,
    Sphere,
    GlassSphere,
    Backdrop,
}

impl MeshKind {
    pub fn label(&self) -> &'static str {
        match self {
            MeshKind::Text => "text",
            MeshKind::Donut => "donut",
            MeshKind::Box => "box",
            MeshKind::Sphere => "sphere",
            MeshKind::GlassSphere => "glass sphere",
            MeshKind::Backdrop => "backdrop",
        }
    }
}

/// Position, XYZ Euler rotation and uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Rotation in radians about X, then Y, then Z
    pub rotation: Vector3<f32>,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Model matrix `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_scale(self.scale);
        t * r * s // Order matters: T * R * S
    }
}

/// Geometry uploaded to the GPU
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    edges: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    edge_buffer: Option<wgpu::Buffer>,
    index_count: u32,
    edge_count: u32,
}

impl Mesh {
    pub fn new(data: &GeometryData) -> Self {
        let edges = data.edge_indices();
        Self {
            vertices: data.to_scene_format(),
            index_count: data.indices.len() as u32,
            edge_count: edges.len() as u32,
            indices: data.indices.clone(),
            edges,
            vertex_buffer: None,
            index_buffer: None,
            edge_buffer: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some()
    }

    /// Creates the GPU buffers once
    pub fn init_gpu_resources(&mut self, device: &Device, label: &str) {
        if self.is_uploaded() {
            return;
        }

        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
        self.edge_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Edge Buffer", label)),
            contents: bytemuck::cast_slice(&self.edges),
            usage: wgpu::BufferUsages::INDEX,
        }));

        log::debug!(
            "Uploaded mesh '{}': {} vertices, {} triangles, {} edges",
            label,
            self.vertices.len(),
            self.triangle_count(),
            self.edge_count / 2
        );
    }
}

/// Layout of the per-instance transform bind group (slot 1)
pub fn transform_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_vertex(binding_types::uniform())
        .create(device, "Transform Bind Group Layout")
}

pub struct InstanceGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

/// One placed copy of a mesh
pub struct MeshInstance {
    pub name: String,
    pub kind: MeshKind,
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub transform: Transform,
    pub visible: bool,
    pub gpu_resources: Option<InstanceGpuResources>, // None until init_gpu_resources called
}

impl MeshInstance {
    pub fn new(kind: MeshKind, geometry: GeometryId, material: MaterialId) -> Self {
        Self {
            name: kind.label().to_string(),
            kind,
            geometry,
            material,
            transform: Transform::default(),
            visible: true,
            gpu_resources: None,
        }
    }

    pub fn init_gpu_resources(&mut self, device: &Device, layout: &BindGroupLayoutWithDesc) {
        if self.gpu_resources.is_some() {
            return;
        }

        // cgmath matrices are already column-major for GPU
        let matrix = self.transform.matrix();
        let transform_data: &[f32; 16] = matrix.as_ref();

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Uniform Buffer"),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = BindGroupBuilder::new(layout)
            .resource(transform_buffer.as_entire_binding())
            .create(device, "Transform Bind Group");

        self.gpu_resources = Some(InstanceGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }

    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }
}

pub trait DrawObject<'a> {
    /// Filled triangles
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    /// Unique triangle edges, for a line-list pipeline
    fn draw_mesh_edges(&mut self, mesh: &'a Mesh);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }

    fn draw_mesh_edges(&mut self, mesh: &'b Mesh) {
        let (Some(vertex_buffer), Some(edge_buffer)) = (&mesh.vertex_buffer, &mesh.edge_buffer)
        else {
            return;
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.edge_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, SquareMatrix, Vector4};
    use std::f32::consts::FRAC_PI_2;

    fn is_identity(matrix: &Matrix4<f32>, epsilon: f32) -> bool {
        let identity = Matrix4::<f32>::identity();
        (0..4).all(|c| (0..4).all(|r| (matrix[c][r] - identity[c][r]).abs() <= epsilon))
    }

    #[test]
    fn test_default_transform_is_identity() {
        assert!(is_identity(&Transform::default().matrix(), 0.0));
    }

    #[test]
    fn test_transform_applies_scale_then_rotation_then_translation() {
        let transform = Transform {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::new(0.0, FRAC_PI_2, 0.0),
            scale: 2.0,
        };

        // +X scaled to 2, rotated a quarter turn about Y to -Z, then translated
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.truncate() - Vector3::new(1.0, 2.0, 1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_x_rotation_applies_after_y_rotation() {
        let transform = Transform {
            rotation: Vector3::new(FRAC_PI_2, FRAC_PI_2, 0.0),
            ..Transform::default()
        };

        // Y quarter turn sends +X to -Z, X quarter turn sends -Z to +Y
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 0.0);
        assert!((p.truncate() - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_mesh_counts_edges_once() {
        let data = crate::gfx::geometry::generate_box(1.0, 1.0, 1.0);
        let mesh = Mesh::new(&data);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        // 6 faces, each 4 outer edges + 1 diagonal
        assert_eq!(mesh.edge_count, 30 * 2);
        assert!(!mesh.is_uploaded());
    }
}
