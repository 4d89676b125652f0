//! # Primitive Shape Generation
//!
//! This module contains functions to generate the primitive shapes placed
//! around the scene. All shapes are centered at the origin with outward normals.
//! Coordinates are Y-up.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box centered at the origin
///
/// Each face has its own four vertices so normals stay flat per face.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    // (normal, u axis, v axis) for each face; corners are normal ± u ± v
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    for (normal, u, v) in faces {
        let base = data.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = [
                (normal[0] + u[0] * su + v[0] * sv) * hx,
                (normal[1] + u[1] * su + v[1] * sv) * hy,
                (normal[2] + u[2] * su + v[2] * sv) * hz,
            ];
            data.push_vertex(position, normal);
        }

        // Indices for each face (2 triangles per face, counter-clockwise)
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere with specified radius and resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of longitude segments
/// * `height_segments` - Number of latitude segments
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = width_segments.max(3);
    let lat_segs = height_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI

            let normal = [sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin()];
            data.push_vertex(
                [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
            );
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the torus center to the tube center
/// * `tube` - Tube radius
/// * `radial_segments` - Segments around the tube cross-section
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;

            let position = [
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            ];

            // Normal points from the tube's center line to the surface
            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            let normal = [
                (position[0] - center[0]) / tube,
                (position[1] - center[1]) / tube,
                (position[2] - center[2]) / tube,
            ];

            data.push_vertex(position, normal);
        }
    }

    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (tubular + 1) * j + i - 1;
            let b = (tubular + 1) * (j - 1) + i - 1;
            let c = (tubular + 1) * (j - 1) + i;
            let d = (tubular + 1) * j + i;

            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[b, c, d]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(0.5, 0.5, 0.5);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);

        let (min, max) = cube.bounding_box().unwrap();
        assert_eq!(min, [-0.25, -0.25, -0.25]);
        assert_eq!(max, [0.25, 0.25, 0.25]);
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let cube = generate_box(1.0, 2.0, 3.0);
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [
                cube.vertices[tri[0] as usize],
                cube.vertices[tri[1] as usize],
                cube.vertices[tri[2] as usize],
            ];
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let cross = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let n = cube.normals[tri[0] as usize];
            let dot = cross[0] * n[0] + cross[1] * n[1] + cross[2] * n[2];
            assert!(dot > 0.0, "triangle {:?} winds inward", tri);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.25, 32, 32);
        assert_eq!(sphere.vertices.len(), 33 * 33);
        assert_eq!(sphere.triangle_count(), 32 * 32 * 2);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());

        for v in &sphere.vertices {
            assert!((length(*v) - 0.25).abs() < 1e-5);
        }
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(0.3, 0.2, 20, 45);
        assert_eq!(torus.vertices.len(), 21 * 46);
        assert_eq!(torus.triangle_count(), 20 * 45 * 2);

        for n in &torus.normals {
            assert!((length(*n) - 1.0).abs() < 1e-4);
        }

        let (min, max) = torus.bounding_box().unwrap();
        assert!((max[0] - 0.5).abs() < 1e-4);
        assert!((min[2] + 0.2).abs() < 1e-4);
        assert!((max[2] - 0.2).abs() < 1e-4);
    }
}
