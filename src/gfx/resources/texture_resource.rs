//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU textures, views, and samplers: the depth
//! buffer and the environment cube maps.

use crate::assets::CubeMapImage;

/// GPU texture resource containing texture, view, and sampler
///
/// Bundles the three main components needed for texture operations:
/// - Texture: The actual GPU memory allocation
/// - View: Interface for shader access
/// - Sampler: Filtering and addressing configuration
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Environment maps are stored as sRGB so reflections sample linear color
    pub const CUBE_MAP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads a cube map with its full mip chain
    ///
    /// The view is a `Cube` view over all six layers and every mip level, and the
    /// sampler filters linearly between levels so rough materials can blur.
    pub fn create_cube_map(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &CubeMapImage,
        label: &str,
    ) -> Self {
        let mip_level_count = image.mip_level_count();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.size,
                height: image.size,
                depth_or_array_layers: 6,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::CUBE_MAP_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for face in 0..image.faces.len() {
            for (level, pixels) in image.face_mips(face).iter().enumerate() {
                queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &texture,
                        mip_level: level as u32,
                        origin: wgpu::Origin3d {
                            x: 0,
                            y: 0,
                            z: face as u32,
                        },
                        aspect: wgpu::TextureAspect::All,
                    },
                    pixels.as_raw(),
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * pixels.width()),
                        rows_per_image: Some(pixels.height()),
                    },
                    wgpu::Extent3d {
                        width: pixels.width(),
                        height: pixels.height(),
                        depth_or_array_layers: 1,
                    },
                );
            }
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&format!("{} View", label)),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            array_layer_count: Some(6),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::debug!(
            "Uploaded cube map '{}' ({}px, {} mips)",
            label,
            image.size,
            mip_level_count
        );

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// GPU copies of the environment map table, indexed like the table
pub struct EnvironmentTextures {
    maps: Vec<TextureResource>,
}

impl EnvironmentTextures {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        table: &crate::assets::EnvironmentMapTable,
    ) -> Self {
        let mut maps: Vec<TextureResource> = table
            .iter()
            .enumerate()
            .map(|(index, image)| {
                TextureResource::create_cube_map(
                    device,
                    queue,
                    image,
                    &format!("Environment Map {}", index),
                )
            })
            .collect();

        // Materials always need something to bind
        if maps.is_empty() {
            maps.push(TextureResource::create_cube_map(
                device,
                queue,
                &CubeMapImage::solid([0, 0, 0, 255]),
                "Environment Map Fallback",
            ));
        }

        Self { maps }
    }

    /// Map for `index`, falling back to map 0 for out-of-range indices
    pub fn get(&self, index: usize) -> &TextureResource {
        self.maps.get(index).unwrap_or(&self.maps[0])
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
