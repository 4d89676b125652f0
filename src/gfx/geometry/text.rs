//! Extruded text geometry
//!
//! Glyph outlines are filled with lyon's tessellator for the front and back caps
//! and flattened into polylines for the side walls. The result spans
//! `z ∈ [0, depth]` until [`GeometryData::center`] is applied.

use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};

use super::GeometryData;
use crate::assets::{AssetError, VectorFont};
use crate::config::TextConfig;

/// Parameters of an extruded outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    pub depth: f32,
    /// Maximum distance between a curve and its flattened approximation
    pub tolerance: f32,
}

impl ExtrudeOptions {
    /// Derives a flattening tolerance from a per-curve segment count
    pub fn from_text_config(config: &TextConfig) -> Self {
        Self {
            depth: config.depth,
            tolerance: config.size / (config.curve_segments.max(1) as f32 * 10.0),
        }
    }
}

/// Builds the centered, extruded mesh for `config.content`
pub fn generate_text(font: &VectorFont, config: &TextConfig) -> Result<GeometryData, AssetError> {
    let outline = font.text_outline(&config.content, config.size)?;
    let mut data = extrude_outline(&outline, ExtrudeOptions::from_text_config(config))?;
    data.center();

    log::debug!(
        "Text {:?}: {} vertices, {} triangles",
        config.content,
        data.vertex_count(),
        data.triangle_count()
    );
    Ok(data)
}

/// Fills and extrudes a closed outline along +Z
pub fn extrude_outline(path: &Path, options: ExtrudeOptions) -> Result<GeometryData, AssetError> {
    let mut data = GeometryData::new();

    let mut cap: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            path,
            &FillOptions::tolerance(options.tolerance).with_fill_rule(FillRule::NonZero),
            &mut BuffersBuilder::new(&mut cap, |vertex: FillVertex| vertex.position().to_array()),
        )
        .map_err(|err| AssetError::Tessellation(format!("{err:?}")))?;

    // Front cap at z = depth, back cap at z = 0 with reversed winding
    let front = data.vertices.len() as u32;
    for p in &cap.vertices {
        data.push_vertex([p[0], p[1], options.depth], [0.0, 0.0, 1.0]);
    }
    let back = data.vertices.len() as u32;
    for p in &cap.vertices {
        data.push_vertex([p[0], p[1], 0.0], [0.0, 0.0, -1.0]);
    }
    for tri in cap.indices.chunks_exact(3) {
        data.indices
            .extend_from_slice(&[front + tri[0], front + tri[1], front + tri[2]]);
        data.indices
            .extend_from_slice(&[back + tri[0], back + tri[2], back + tri[1]]);
    }

    for (from, to) in contour_segments(path, options.tolerance) {
        push_side_wall(&mut data, from, to, options.depth);
    }

    Ok(data)
}

/// Straight segments of every flattened contour, including the closing edge
fn contour_segments(path: &Path, tolerance: f32) -> Vec<([f32; 2], [f32; 2])> {
    let mut segments = Vec::new();

    for event in path.iter().flattened(tolerance) {
        match event {
            PathEvent::Line { from, to } => segments.push((from.to_array(), to.to_array())),
            PathEvent::End { last, first, .. } if last != first => {
                segments.push((last.to_array(), first.to_array()))
            }
            _ => {}
        }
    }

    segments
}

fn push_side_wall(data: &mut GeometryData, from: [f32; 2], to: [f32; 2], depth: f32) {
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return;
    }

    // Perpendicular in the outline plane; two-sided shading fixes the facing
    let normal = [dy / length, -dx / length, 0.0];

    let base = data.vertices.len() as u32;
    data.push_vertex([from[0], from[1], 0.0], normal);
    data.push_vertex([to[0], to[1], 0.0], normal);
    data.push_vertex([to[0], to[1], depth], normal);
    data.push_vertex([from[0], from[1], depth], normal);

    data.indices
        .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;

    fn unit_square() -> Path {
        let mut builder = Path::builder();
        builder.begin(point(0.0, 0.0));
        builder.line_to(point(1.0, 0.0));
        builder.line_to(point(1.0, 1.0));
        builder.line_to(point(0.0, 1.0));
        builder.end(true);
        builder.build()
    }

    #[test]
    fn test_square_extrusion_has_caps_and_four_walls() {
        let options = ExtrudeOptions {
            depth: 0.2,
            tolerance: 0.01,
        };
        let data = extrude_outline(&unit_square(), options).unwrap();

        let wall_vertices = data.normals.iter().filter(|n| n[2] == 0.0).count();
        assert_eq!(wall_vertices, 16);

        let front_vertices = data.normals.iter().filter(|n| n[2] == 1.0).count();
        let back_vertices = data.normals.iter().filter(|n| n[2] == -1.0).count();
        assert!(front_vertices >= 4);
        assert_eq!(front_vertices, back_vertices);

        let (min, max) = data.bounding_box().unwrap();
        assert_eq!(min, [0.0, 0.0, 0.0]);
        assert_eq!(max, [1.0, 1.0, 0.2]);
    }

    #[test]
    fn test_caps_cover_outline_area() {
        let data = extrude_outline(
            &unit_square(),
            ExtrudeOptions {
                depth: 0.1,
                tolerance: 0.01,
            },
        )
        .unwrap();

        let area: f32 = data
            .indices
            .chunks_exact(3)
            .filter(|tri| data.normals[tri[0] as usize][2] == 1.0)
            .map(|tri| {
                let a = data.vertices[tri[0] as usize];
                let b = data.vertices[tri[1] as usize];
                let c = data.vertices[tri[2] as usize];
                ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() * 0.5
            })
            .sum();

        assert!((area - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tolerance_follows_curve_segments() {
        let options = ExtrudeOptions::from_text_config(&TextConfig::default());
        assert_eq!(options.depth, 0.2);
        assert!((options.tolerance - 0.4 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_centered_extrusion() {
        let mut data = extrude_outline(
            &unit_square(),
            ExtrudeOptions {
                depth: 0.2,
                tolerance: 0.01,
            },
        )
        .unwrap();
        data.center();

        let (min, max) = data.bounding_box().unwrap();
        assert_eq!(min, [-0.5, -0.5, -0.1]);
        assert_eq!(max, [0.5, 0.5, 0.1]);
    }
}
