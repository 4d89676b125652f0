//! # Procedural Geometry Generation
//!
//! Generators for every mesh the showcase draws: the primitive shapes scattered
//! around the scene and the extruded text in the middle of it.
//!
//! ## Supported Geometry
//!
//! - **Torus**: ring with configurable radius, tube and segment counts
//! - **Box**: axis-aligned box with per-face normals
//! - **Sphere**: UV sphere with configurable radius and resolution
//! - **Text**: glyph outlines filled and extruded along Z (see [`text`])
//!
//! ## Usage
//!
//! ```rust
//! use scenic::gfx::geometry::{generate_box, generate_sphere, generate_torus};
//!
//! let donut = generate_torus(0.3, 0.2, 20, 45);
//! let cube = generate_box(0.5, 0.5, 0.5);
//! let ball = generate_sphere(0.25, 32, 32);
//! assert!(donut.triangle_count() > 0 && cube.triangle_count() == 12 && ball.vertex_count() > 0);
//! ```

pub mod primitives;
pub mod text;

pub use primitives::*;
pub use text::{extrude_outline, generate_text, ExtrudeOptions};

use std::collections::HashSet;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        self.vertices.push(position);
        self.normals.push(normal);
        (self.vertices.len() - 1) as u32
    }

    /// Axis-aligned bounds as (min, max), or `None` for empty geometry
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut min, mut max), v| {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
            (min, max)
        }))
    }

    /// Translates the geometry so its bounding box is centered on the origin
    pub fn center(&mut self) {
        let Some((min, max)) = self.bounding_box() else {
            return;
        };
        let offset = [
            (min[0] + max[0]) * 0.5,
            (min[1] + max[1]) * 0.5,
            (min[2] + max[2]) * 0.5,
        ];
        for v in &mut self.vertices {
            v[0] -= offset[0];
            v[1] -= offset[1];
            v[2] -= offset[2];
        }
    }

    /// Unique triangle edges as a line list, for wireframe rendering
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();

        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                if seen.insert((a.min(b), a.max(b))) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }

        lines
    }

    /// Convert to the vertex format used by the renderer
    pub fn to_scene_format(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_moves_bounds_to_origin() {
        let mut data = GeometryData::new();
        data.push_vertex([1.0, 2.0, 0.0], [0.0, 0.0, 1.0]);
        data.push_vertex([3.0, 6.0, 0.2], [0.0, 0.0, 1.0]);
        data.center();

        let (min, max) = data.bounding_box().unwrap();
        assert_eq!(min, [-1.0, -2.0, -0.1]);
        assert_eq!(max, [1.0, 2.0, 0.1]);
    }

    #[test]
    fn test_edges_shared_by_triangles_are_emitted_once() {
        let mut data = GeometryData::new();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]] {
            data.push_vertex(p, [0.0, 0.0, 1.0]);
        }
        data.indices = vec![0, 1, 2, 2, 3, 0];

        // Quad made of two triangles: 4 outer edges + 1 diagonal
        assert_eq!(data.edge_indices().len(), 5 * 2);
    }

    #[test]
    fn test_empty_geometry_has_no_bounds() {
        let mut data = GeometryData::new();
        assert!(data.bounding_box().is_none());
        data.center();
        assert!(data.vertices.is_empty());
    }
}
