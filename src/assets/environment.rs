//! Environment cube maps
//!
//! Each environment map is a directory of six square PNG faces. Faces are
//! decoded to RGBA8 and a full mip chain is built on the CPU so rough materials
//! can sample blurrier levels.

use std::path::{Path, PathBuf};

use image::{imageops::FilterType, RgbaImage};
use rand::Rng;

use super::AssetError;
use crate::config::AssetPaths;

/// Six decoded cube faces of identical square size, in +X, -X, +Y, -Y, +Z, -Z order
#[derive(Clone)]
pub struct CubeMapImage {
    pub size: u32,
    pub faces: Vec<RgbaImage>,
}

impl CubeMapImage {
    /// Decodes the six faces found in `dir`
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let mut faces = Vec::with_capacity(6);
        let mut size = None;

        for path in AssetPaths::cube_faces(dir) {
            let face = image::open(&path)
                .map_err(|source| AssetError::Image {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();

            let expected = *size.get_or_insert(face.width());
            if face.width() != expected || face.height() != expected {
                return Err(AssetError::CubeFaceSize {
                    path,
                    width: face.width(),
                    height: face.height(),
                    expected,
                });
            }
            faces.push(face);
        }

        Ok(Self {
            size: size.unwrap_or(1),
            faces,
        })
    }

    /// 1x1 cube map of a single color, used in place of maps that fail to load
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            size: 1,
            faces: (0..6)
                .map(|_| RgbaImage::from_pixel(1, 1, image::Rgba(color)))
                .collect(),
        }
    }

    /// Number of mip levels down to 1x1
    pub fn mip_level_count(&self) -> u32 {
        u32::BITS - self.size.max(1).leading_zeros()
    }

    /// Successively halved copies of one face, level 0 first
    pub fn face_mips(&self, face: usize) -> Vec<RgbaImage> {
        let mut levels = Vec::with_capacity(self.mip_level_count() as usize);
        let mut current = self.faces[face].clone();

        for _ in 1..self.mip_level_count() {
            let next_size = (current.width() / 2).max(1);
            let next = image::imageops::resize(&current, next_size, next_size, FilterType::Triangle);
            levels.push(current);
            current = next;
        }
        levels.push(current);

        levels
    }
}

/// Indexed set of environment maps available to reflective materials
pub struct EnvironmentMapTable {
    maps: Vec<CubeMapImage>,
}

impl EnvironmentMapTable {
    /// Loads every directory in order; a map that fails is replaced by solid black
    pub fn load(dirs: &[PathBuf]) -> Self {
        let maps = dirs
            .iter()
            .enumerate()
            .map(|(index, dir)| match CubeMapImage::load(dir) {
                Ok(map) => {
                    log::info!(
                        "Loaded environment map {} from {} ({}px)",
                        index,
                        dir.display(),
                        map.size
                    );
                    map
                }
                Err(err) => {
                    log::warn!("Environment map {} unavailable: {}", index, err);
                    CubeMapImage::solid([0, 0, 0, 255])
                }
            })
            .collect();

        Self { maps }
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CubeMapImage> {
        self.maps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CubeMapImage> {
        self.maps.iter()
    }
}

/// Draws `floor(U(0,1) * (table_len - 1))`
///
/// The bound is one less than the table size, so the last map is never picked.
/// Tables with fewer than two maps always yield index 0.
pub fn draw_reflection_index<R: Rng + ?Sized>(rng: &mut R, table_len: usize) -> usize {
    let bound = table_len.saturating_sub(1);
    if bound == 0 {
        return 0;
    }
    rng.random_range(0..bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_draw_never_selects_last_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [0usize; 4];

        for _ in 0..10_000 {
            let index = draw_reflection_index(&mut rng, 4);
            assert!(index < 3, "drew forbidden index {}", index);
            seen[index] += 1;
        }

        assert_eq!(seen[3], 0);
        assert!(seen[..3].iter().all(|&count| count > 0));
    }

    #[test]
    fn test_draw_on_tiny_tables() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw_reflection_index(&mut rng, 0), 0);
        assert_eq!(draw_reflection_index(&mut rng, 1), 0);
        assert_eq!(draw_reflection_index(&mut rng, 2), 0);
    }

    #[test]
    fn test_mip_chain_halves_to_one_pixel() {
        let mut map = CubeMapImage::solid([10, 20, 30, 255]);
        map.size = 8;
        map.faces = (0..6)
            .map(|_| RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 255])))
            .collect();

        assert_eq!(map.mip_level_count(), 4);
        let sizes: Vec<u32> = map.face_mips(2).iter().map(|level| level.width()).collect();
        assert_eq!(sizes, vec![8, 4, 2, 1]);
    }

    #[test]
    fn test_missing_maps_fall_back_to_black() {
        let table = EnvironmentMapTable::load(&[
            PathBuf::from("no/such/map/0"),
            PathBuf::from("no/such/map/1"),
        ]);

        assert_eq!(table.len(), 2);
        let fallback = table.get(1).unwrap();
        assert_eq!(fallback.size, 1);
        assert_eq!(fallback.mip_level_count(), 1);
        assert_eq!(fallback.faces[0].get_pixel(0, 0).0, [0, 0, 0, 255]);
    }
}
