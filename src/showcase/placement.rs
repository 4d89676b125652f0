//! Random placement of primitive instances

use std::f32::consts::PI;

use cgmath::Vector3;
use rand::Rng;

use crate::gfx::scene::MeshInstance;

/// Half-extent of the cube instances are scattered in
pub const SCATTER_EXTENT: f32 = 5.0;

/// Gives `instance` a random position, rotation and uniform scale
///
/// - position: each axis `(U - 0.5) * 10`, within `[-5, 5]`
/// - rotation: x and y `U * π`; z is left at 0
/// - scale: a single draw `U` applied to every axis
pub fn place_randomly<'a, R: Rng + ?Sized>(
    rng: &mut R,
    instance: &'a mut MeshInstance,
) -> &'a mut MeshInstance {
    let span = SCATTER_EXTENT * 2.0;
    instance.transform.position = Vector3::new(
        (rng.random::<f32>() - 0.5) * span,
        (rng.random::<f32>() - 0.5) * span,
        (rng.random::<f32>() - 0.5) * span,
    );

    instance.transform.rotation.x = rng.random::<f32>() * PI;
    instance.transform.rotation.y = rng.random::<f32>() * PI;

    instance.transform.scale = rng.random::<f32>();

    instance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::MeshKind;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_placement_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let mut instance = MeshInstance::new(MeshKind::Donut, 0, 0);
            place_randomly(&mut rng, &mut instance);
            let t = &instance.transform;

            for axis in [t.position.x, t.position.y, t.position.z] {
                assert!((-5.0..=5.0).contains(&axis), "position {} out of range", axis);
            }
            assert!((0.0..=PI).contains(&t.rotation.x));
            assert!((0.0..=PI).contains(&t.rotation.y));
            assert_eq!(t.rotation.z, 0.0);
            assert!((0.0..=1.0).contains(&t.scale));
        }
    }

    #[test]
    fn test_placement_returns_the_same_instance() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut instance = MeshInstance::new(MeshKind::Box, 2, 5);
        let placed = place_randomly(&mut rng, &mut instance);
        assert_eq!(placed.geometry, 2);
        assert_eq!(placed.material, 5);
        assert_ne!(instance.transform.position, Vector3::new(0.0, 0.0, 0.0));
    }
}
