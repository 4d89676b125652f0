//! Window and event loop
//!
//! [`SceneApp`] owns the winit event loop; the per-window state lives in
//! [`AppState`], which implements [`ApplicationHandler`].

use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    assets::{AssetRequest, EnvironmentMapTable, VectorFont},
    config::SceneConfig,
    gfx::{camera::CameraManager, rendering::RenderEngine, scene::Scene},
    showcase::{populate, Parameters, SceneBindings},
    ui::{parameters_panel, UiManager},
};

/// Highest device pixel ratio the scene is rendered at
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Render target size for a window: logical size times the clamped pixel ratio
pub fn render_resolution(physical: PhysicalSize<u32>, scale_factor: f64) -> PhysicalSize<u32> {
    let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    };
    let logical: LogicalSize<f64> = physical.to_logical(scale_factor);
    let ratio = scale_factor.min(MAX_PIXEL_RATIO);
    PhysicalSize::new(
        (logical.width * ratio).round() as u32,
        (logical.height * ratio).round() as u32,
    )
}

pub struct SceneApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    parameters: Parameters,
    environment_count: usize,
    font_request: Option<AssetRequest<VectorFont>>,
    bindings: Option<SceneBindings>,
    fatal: Option<anyhow::Error>,
}

impl SceneApp {
    /// Creates the event loop and an empty scene holding only the camera
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let (width, height) = config.window_size;
        let aspect = width as f32 / height.max(1) as f32;
        let scene = Scene::new(CameraManager::from_config(&config.camera, aspect));
        let parameters = Parameters::new(&mut rand::rng());
        log::debug!("Initial color {}", parameters.color.css());

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                parameters,
                environment_count: 0,
                font_request: None,
                bindings: None,
                fatal: None,
            },
        })
    }

    /// Runs until the window closes; returns setup failures raised inside the loop
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated with an error")?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.window_title.clone())
                    .with_inner_size(LogicalSize::new(width, height)),
            )
            .context("Failed to create window")?;
        let window = Arc::new(window);

        let environments = EnvironmentMapTable::load(&self.config.assets.environment_maps);
        self.environment_count = environments.len();

        let size = render_resolution(window.inner_size(), window.scale_factor());
        let render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            size.width,
            size.height,
            &environments,
            self.config.clear_color,
        ))?;

        let mut ui_manager = UiManager::new(
            render_engine.device(),
            render_engine.queue(),
            render_engine.surface_format(),
            &window,
        );
        ui_manager.update_display_size(size.width, size.height);

        self.scene
            .camera_manager
            .camera
            .resize_projection(size.width, size.height);

        let font_path = self.config.assets.font.clone();
        self.font_request = Some(AssetRequest::spawn("font", move || {
            VectorFont::load(font_path)
        }));

        self.render_engine = Some(render_engine);
        self.ui_manager = Some(ui_manager);
        self.window = Some(window);
        Ok(())
    }

    /// Builds the scene the first time the font arrives
    fn poll_font(&mut self) {
        let Some(font) = self.font_request.as_mut().and_then(AssetRequest::poll) else {
            return;
        };
        self.font_request = None;

        match populate(
            &mut self.scene,
            &font,
            self.environment_count,
            &self.parameters.color,
            &self.config,
        ) {
            Ok(bindings) => self.bindings = Some(bindings),
            Err(err) => log::warn!("Scene left empty: {}", err),
        }
    }

    fn redraw(&mut self) {
        self.poll_font();

        let (Some(window), Some(render_engine), Some(ui_manager)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };

        self.scene.camera_manager.update();
        let camera = &mut self.scene.camera_manager.camera;
        self.parameters.camera.tick(&mut camera.eye);
        camera.sync_from_eye();

        let parameters = &mut self.parameters;
        let materials = &mut self.scene.material_manager;
        let bindings = self.bindings.as_ref();
        ui_manager.update_logic(window, |ui| {
            parameters_panel(ui, parameters, materials, bindings);
        });

        render_engine.prepare_scene(&mut self.scene);
        self.scene.update();
        render_engine.update(self.scene.camera_manager.camera.uniform);

        render_engine.render_frame_with_ui(&self.scene, |device, queue, encoder, view| {
            ui_manager.render_display_only(device, queue, encoder, view);
        });

        window.request_redraw();
    }

    fn resize(&mut self, physical: PhysicalSize<u32>) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let size = render_resolution(physical, window.scale_factor());
        if size.width == 0 || size.height == 0 {
            return;
        }

        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.resize(size.width, size.height);
        }
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            ui_manager.update_display_size(size.width, size.height);
        }
        self.scene
            .camera_manager
            .camera
            .resize_projection(size.width, size.height);
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
            event_loop.exit();
            return;
        }
        self.scene.camera_manager.process_keyboard_event(event);
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_window(event_loop) {
            log::error!("{:#}", err);
            self.fatal = Some(err);
            event_loop.exit();
            return;
        }

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::ScaleFactorChanged { .. } => self.resize(window.inner_size()),
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        // Pointer over the panel does not orbit the camera
        if self
            .ui_manager
            .as_ref()
            .is_some_and(UiManager::wants_input)
        {
            return;
        }

        self.scene.camera_manager.process_event(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_matches_physical_up_to_ratio_two() {
        let size = PhysicalSize::new(2400, 1600);
        assert_eq!(render_resolution(size, 2.0), size);
        let small = PhysicalSize::new(1200, 800);
        assert_eq!(render_resolution(small, 1.0), small);
    }

    #[test]
    fn test_resolution_clamps_high_density_displays() {
        // 1200x800 logical at 3x
        let size = render_resolution(PhysicalSize::new(3600, 2400), 3.0);
        assert_eq!(size, PhysicalSize::new(2400, 1600));
    }

    #[test]
    fn test_resolution_ignores_invalid_scale() {
        let size = PhysicalSize::new(800, 600);
        assert_eq!(render_resolution(size, 0.0), size);
        assert_eq!(render_resolution(size, f64::NAN), size);
    }
}
