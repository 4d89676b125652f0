//! WGPU-based rendering engine
//!
//! Owns the surface, device and every GPU resource shared across the scene, and
//! records one frame as: opaque surfaces, wireframe edges, translucent surfaces
//! back to front, then the UI overlay.

use std::sync::Arc;

use anyhow::Context;
use cgmath::{InnerSpace, Vector3};
use wgpu::TextureFormat;

use crate::{
    assets::EnvironmentMapTable,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            material::{Material, MaterialBindings},
            texture_resource::{EnvironmentTextures, TextureResource},
        },
        scene::{
            object::{transform_bind_group_layout, DrawObject, MeshInstance},
            scene::Scene,
        },
    },
    wgpu_utils::binding_builder::BindGroupLayoutWithDesc,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

pub const SURFACE_PIPELINE: &str = "Surface";
pub const WIREFRAME_PIPELINE: &str = "Wireframe";
pub const TRANSLUCENT_PIPELINE: &str = "Translucent";

/// Layouts and textures every scene object binds against
pub struct SceneResources {
    pub transform_layout: BindGroupLayoutWithDesc,
    pub material_bindings: MaterialBindings,
    pub environments: EnvironmentTextures,
}

/// Which pass draws an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawBucket {
    Opaque,
    Wireframe,
    Translucent,
}

impl DrawBucket {
    /// Wireframe wins over translucency; edges are always drawn opaque
    pub fn for_material(material: &Material) -> Self {
        if material.wireframe {
            DrawBucket::Wireframe
        } else if material.is_translucent() {
            DrawBucket::Translucent
        } else {
            DrawBucket::Opaque
        }
    }
}

/// Indices of `positions` ordered farthest from `eye` first
pub fn back_to_front(positions: &[Vector3<f32>], eye: Vector3<f32>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| {
        let da = (positions[a] - eye).magnitude2();
        let db = (positions[b] - eye).magnitude2();
        db.total_cmp(&da)
    });
    order
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    clear_color: wgpu::Color,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    scene_resources: SceneResources,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Uploads every environment map in `environments` and builds the three
    /// scene pipelines.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        environments: &EnvironmentMapTable,
        clear_color: [f64; 4],
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        // Shading happens in linear space, so let the surface encode sRGB
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let mut global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);
        update_global_ubo(&mut global_ubo, &queue, CameraUniform::default());

        let scene_resources = SceneResources {
            transform_layout: transform_bind_group_layout(&device),
            material_bindings: MaterialBindings::new(&device),
            environments: EnvironmentTextures::upload(&device, &queue, environments),
        };
        log::info!(
            "Uploaded {} environment map(s)",
            scene_resources.environments.len()
        );

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("scene", include_str!("scene.wgsl"));

        let layouts = vec![
            global_bindings.bind_group_layout().clone(),
            scene_resources.transform_layout.layout.clone(),
            scene_resources.material_bindings.bind_group_layout().clone(),
        ];

        // Text and primitives are viewed from inside the backdrop, so nothing is culled
        let base = PipelineConfig::default()
            .with_shader("scene")
            .with_bind_group_layouts(layouts)
            .with_cull_mode(None);

        pipeline_manager.register_pipeline(
            SURFACE_PIPELINE,
            base.clone()
                .with_label("SURFACE")
                .with_depth(TextureResource::DEPTH_FORMAT, true)
                .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
        );

        pipeline_manager.register_pipeline(
            WIREFRAME_PIPELINE,
            base.clone()
                .with_label("WIREFRAME")
                .with_fragment_entry("fs_wire")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_depth(TextureResource::DEPTH_FORMAT, true)
                .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
        );

        pipeline_manager.register_pipeline(
            TRANSLUCENT_PIPELINE,
            base.with_label("TRANSLUCENT")
                .with_depth(TextureResource::DEPTH_FORMAT, false)
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING)),
        );

        pipeline_manager.create_all_pipelines()?;

        let [r, g, b, a] = clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            clear_color: wgpu::Color { r, g, b, a },
            pipeline_manager,
            global_ubo,
            global_bindings,
            scene_resources,
        })
    }

    /// Creates GPU resources for objects added since the last frame
    pub fn prepare_scene(&self, scene: &mut Scene) {
        scene.init_gpu_resources(&self.device, &self.queue, &self.scene_resources);
    }

    /// Renders one frame, handing the encoder to `ui_callback` after the scene
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                log::warn!("Skipping frame: {}", err);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if let Err(err) = self.record_scene(&mut encoder, &surface_texture_view, scene) {
            log::error!("Failed to record scene: {}", err);
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Convenience method for rendering with UI
    pub fn render_frame_with_ui<F>(&mut self, scene: &Scene, ui_callback: F)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.render_frame(scene, Some(ui_callback));
    }

    fn record_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        scene: &Scene,
    ) -> anyhow::Result<()> {
        let surface_pipeline = self.pipeline_manager.get_pipeline(SURFACE_PIPELINE)?;
        let wireframe_pipeline = self.pipeline_manager.get_pipeline(WIREFRAME_PIPELINE)?;
        let translucent_pipeline = self.pipeline_manager.get_pipeline(TRANSLUCENT_PIPELINE)?;
        let global_bind_group = self
            .global_bindings
            .bind_group()
            .context("Global bind group was never created")?;

        let mut opaque = Vec::new();
        let mut wireframe = Vec::new();
        let mut translucent = Vec::new();
        for object in scene.objects.iter().filter(|obj| obj.visible) {
            let Some(material) = scene.get_material(object.material) else {
                continue;
            };
            match DrawBucket::for_material(material) {
                DrawBucket::Opaque => opaque.push(object),
                DrawBucket::Wireframe => wireframe.push(object),
                DrawBucket::Translucent => translucent.push(object),
            }
        }

        let positions: Vec<Vector3<f32>> = translucent
            .iter()
            .map(|obj| obj.transform.position)
            .collect();
        let eye = scene.camera_manager.camera.eye;
        let translucent: Vec<&MeshInstance> = back_to_front(&positions, eye)
            .into_iter()
            .map(|index| translucent[index])
            .collect();

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.set_bind_group(0, global_bind_group, &[]);

        render_pass.set_pipeline(surface_pipeline);
        for object in &opaque {
            draw_object(&mut render_pass, scene, object, false);
        }

        render_pass.set_pipeline(wireframe_pipeline);
        for object in &wireframe {
            draw_object(&mut render_pass, scene, object, true);
        }

        render_pass.set_pipeline(translucent_pipeline);
        for object in &translucent {
            draw_object(&mut render_pass, scene, object, false);
        }

        Ok(())
    }

    /// Writes the camera into the global uniform buffer
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform);
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimized window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn scene_resources(&self) -> &SceneResources {
        &self.scene_resources
    }
}

fn draw_object<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    scene: &'a Scene,
    object: &'a MeshInstance,
    edges: bool,
) {
    let (Some(mesh), Some(material), Some(transform_bind_group)) = (
        scene.mesh(object.geometry),
        scene.get_material(object.material),
        object.get_transform_bind_group(),
    ) else {
        return;
    };
    let Some(material_bind_group) = material.get_bind_group() else {
        return;
    };

    render_pass.set_bind_group(1, transform_bind_group, &[]);
    render_pass.set_bind_group(2, material_bind_group, &[]);
    if edges {
        render_pass.draw_mesh_edges(mesh);
    } else {
        render_pass.draw_mesh(mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_follow_material_flags() {
        let solid = Material::metallic("text", 0);
        assert_eq!(DrawBucket::for_material(&solid), DrawBucket::Opaque);

        let glass = Material::unlit("backdrop", [1.0, 1.0, 1.0]).with_alpha(0.5);
        assert_eq!(DrawBucket::for_material(&glass), DrawBucket::Translucent);

        let wire = Material::unlit("colored", [1.0, 0.0, 0.0])
            .with_alpha(0.5)
            .with_wireframe(true);
        assert_eq!(DrawBucket::for_material(&wire), DrawBucket::Wireframe);
    }

    #[test]
    fn test_back_to_front_orders_by_distance() {
        let positions = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(5.0, 0.0, 0.0),
            Vector3::new(-3.0, 0.0, 0.0),
        ];
        let order = back_to_front(&positions, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_back_to_front_empty() {
        assert!(back_to_front(&[], Vector3::new(0.0, 0.0, 0.0)).is_empty());
    }
}
