//! Core application state and lifecycle.

use kurbo::{Point, Rect, Size};
use peniko::Color;
use scribble_core::events::needs_redraw;
use scribble_core::{Canvas, CanvasConfig, Viewport};
use scribble_render::{
    RenderContext, Renderer, VelloRenderer, create_gpu_renderer, render_scene_to_view,
};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::error::EventLoopError;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::event_handler::{EventHandler, map_button, map_modifiers};
use crate::export;
use crate::ui::{CanvasStatus, TOOLBAR_GAP, UiAction, UiState, render_ui};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Drawing surface size in canvas units.
    pub canvas_size: Size,
    /// Export resolution multiplier.
    pub export_scale: f64,
    /// File name of the export, without extension.
    pub export_file_name: String,
    pub background_color: Color,
    pub canvas_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Drawing App".to_string(),
            width: 640,
            height: 640,
            canvas_size: Size::new(256.0, 256.0),
            export_scale: 4.0,
            export_file_name: "drawing".to_string(),
            background_color: Color::from_rgba8(240, 240, 240, 255),
            canvas_color: Color::WHITE,
        }
    }
}

impl AppConfig {
    fn canvas_config(&self) -> CanvasConfig {
        CanvasConfig::default().with_size(self.canvas_size)
    }
}

/// Apply a UI action to the canvas.
///
/// Returns `true` when the action asks for a PNG export, which needs the GPU
/// and is carried out by the caller.
pub fn apply_action(
    canvas: &mut Canvas,
    ui_state: &mut UiState,
    rng: &mut fastrand::Rng,
    action: UiAction,
) -> bool {
    match action {
        UiAction::SetThickness(thickness) => canvas.set_thickness(thickness),
        UiAction::PlaceSticker(glyph) => {
            let position = canvas.place_sticker(&glyph, rng);
            log::debug!("Placed sticker {glyph} at ({:.0}, {:.0})", position.x, position.y);
        }
        UiAction::OpenStickerPrompt => ui_state.open_sticker_prompt(),
        UiAction::AddCustomSticker(icon) => {
            if let Err(e) = canvas.add_custom_sticker(&icon) {
                log::warn!("Custom sticker rejected: {e}");
            }
        }
        UiAction::Clear => canvas.clear(),
        UiAction::Undo => {
            canvas.undo();
        }
        UiAction::Redo => {
            canvas.redo();
        }
        UiAction::ExportPng => return true,
    }
    false
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    scene_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    canvas: Canvas,
    events: EventHandler,
    rng: fastrand::Rng,
    export_requested: bool,
    config: AppConfig,
}

impl AppState {
    fn apply(&mut self, action: UiAction) {
        if apply_action(&mut self.canvas, &mut self.ui_state, &mut self.rng, action) {
            self.export_requested = true;
        }
    }

    /// Whether egui should get the pointer instead of the canvas.
    fn ui_wants_pointer(&self) -> bool {
        self.ui_state.sticker_prompt_open
            || self.egui_ctx.is_pointer_over_area()
            || self.egui_ctx.wants_pointer_input()
    }

    fn ui_wants_keyboard(&self) -> bool {
        self.ui_state.sticker_prompt_open || self.egui_ctx.wants_keyboard_input()
    }

    /// Run the UI, then draw the canvas and the UI to the window.
    fn redraw(&mut self, render_cx: &vello::util::RenderContext) {
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut ui_action = None;
        let egui_output = {
            let status = CanvasStatus {
                thickness: self.canvas.thickness(),
                can_undo: self.canvas.document.can_undo(),
                can_redo: self.canvas.document.can_redo(),
                stickers: self.canvas.palette.entries(),
            };
            let ui_state = &mut self.ui_state;
            self.egui_ctx.run(egui_input, |ctx| {
                ui_action = render_ui(ctx, ui_state, &status);
            })
        };
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        if let Some(action) = ui_action {
            self.apply(action);
        }

        let width = self.surface.config.width;
        let height = self.surface.config.height;
        let pixels_per_point = egui_output.pixels_per_point as f64;

        // Canvas sits centered under the toolbar, one canvas unit per point.
        let top_margin = (self.ui_state.toolbar_bottom + TOOLBAR_GAP) as f64 * pixels_per_point;
        self.canvas.viewport = Viewport::center_in(
            Rect::new(0.0, 0.0, width as f64, height as f64),
            self.canvas.document.size,
            pixels_per_point,
            top_margin,
        );

        // Everything is replayed below, so queued changes are covered.
        self.canvas.drain_events();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        if std::mem::take(&mut self.export_requested) {
            self.export_png(device, queue);
        }

        let render_ctx = RenderContext::new(&self.canvas, Size::new(width as f64, height as f64))
            .with_scale_factor(pixels_per_point)
            .with_background(self.config.background_color)
            .with_canvas_color(self.config.canvas_color);
        self.scene_renderer.build_scene(&render_ctx);
        let scene = self.scene_renderer.take_scene();

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let params = RenderParams {
            base_color: self.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs a storage texture, and WebGPU only allows that for
        // Rgba8Unorm, so render there and blit to the (maybe BGRA) surface.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = render_scene_to_view(
            &mut self.vello_renderer,
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("{e}");
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            self.texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep Vello content
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        if self.egui_ctx.has_requested_repaint() || self.canvas.has_pending_events() {
            self.window.request_redraw();
        }
    }

    fn export_png(&mut self, device: &vello::wgpu::Device, queue: &vello::wgpu::Queue) {
        let (scene, bounds) = self
            .scene_renderer
            .build_export_scene(&self.canvas.document, self.config.export_scale);
        let width = bounds.width() as u32;
        let height = bounds.height() as u32;
        log::info!("Exporting {} drawables at {}x{}", self.canvas.document.len(), width, height);

        #[cfg(not(target_arch = "wasm32"))]
        let result = export::export_scene(
            device,
            queue,
            &mut self.vello_renderer,
            &scene,
            width,
            height,
            &self.config.export_file_name,
        );
        #[cfg(target_arch = "wasm32")]
        let result = export::spawn_png_export_async(
            device,
            queue,
            &mut self.vello_renderer,
            &scene,
            width,
            height,
            self.config.export_file_name.clone(),
        );

        if let Err(e) = result {
            log::error!("PNG export failed: {e}");
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application until the window closes.
    pub fn run(self) -> Result<(), EventLoopError> {
        let event_loop = EventLoop::new()?;

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(self);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = self;
            event_loop.run_app(&mut app)?;
        }

        Ok(())
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let Some(render_cx) = self.render_cx.as_ref() else {
            log::error!("Render context missing after surface creation");
            return;
        };
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = match create_gpu_renderer(device) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to create Vello renderer: {e}");
                return;
            }
        };

        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let canvas = Canvas::with_config(&self.config.canvas_config());

        log::info!(
            "Scribble initialized - {}x{}, canvas {}x{}",
            surface.config.width,
            surface.config.height,
            canvas.document.size.width,
            canvas.document.size.height
        );

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            scene_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            canvas,
            events: EventHandler::new(),
            rng: fastrand::Rng::new(),
            export_requested: false,
            config: self.config.clone(),
        });

        self.pending_window = None;
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach a canvas to the DOM and size it to the viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;

            let Some(canvas) = crate::web::attach_canvas(self.config.width, self.config.height)
            else {
                log::error!("Failed to create canvas element");
                event_loop.exit();
                return;
            };
            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);

            let surface = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => {
                    log::error!("Failed to create surface: {:?}", e);
                    event_loop.exit();
                    return;
                }
            };

            // SAFETY: the surface borrows the window, which AppState keeps
            // alive in the same struct for as long as the surface exists.
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            self.finish_init(window, surface);
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // On WASM, surface creation is async and starts on the first event
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);

                    let (width, height) =
                        crate::web::viewport_size(self.config.width, self.config.height);
                    let self_ptr = self as *mut Self;
                    let window_clone = window.clone();

                    wasm_bindgen_futures::spawn_local(async move {
                        log::info!("Creating surface asynchronously...");
                        let mut render_cx = vello::util::RenderContext::new();

                        match render_cx
                            .create_surface(
                                window_clone.clone(),
                                width,
                                height,
                                PresentMode::AutoVsync,
                            )
                            .await
                        {
                            Ok(surface) => {
                                let surface: RenderSurface<'static> =
                                    unsafe { std::mem::transmute(surface) };

                                // SAFETY: WASM is single-threaded and the event
                                // loop keeps the App alive.
                                let app = unsafe { &mut *self_ptr };
                                app.render_cx = Some(render_cx);
                                app.finish_init(window_clone, surface);
                            }
                            Err(e) => {
                                log::error!("Failed to create surface: {:?}", e);
                                let app = unsafe { &mut *self_ptr };
                                app.init_in_progress.set(false);
                            }
                        }
                    });
                }

                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                // No surface means nothing to draw on yet; the model is intact.
                if let Some(render_cx) = self.render_cx.as_ref() {
                    state.redraw(render_cx);
                }
                return;
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = Point::new(position.x, position.y);
                if state.ui_wants_pointer() {
                    state.events.cursor_over_ui(&mut state.canvas, point);
                } else {
                    state.events.cursor_moved(&mut state.canvas, point);
                }
            }

            WindowEvent::CursorLeft { .. } => {
                state.events.pointer_left(&mut state.canvas);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(button) = map_button(button) {
                    let pressed = button_state == ElementState::Pressed;
                    // Releases always reach the canvas so a stroke cannot stick.
                    if !pressed || !state.ui_wants_pointer() {
                        state.events.mouse_input(&mut state.canvas, button, pressed);
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && !state.ui_wants_keyboard()
                {
                    if let Some(command) = state.events.shortcut_for(&event.logical_key) {
                        log::debug!("Shortcut: {:?}", command);
                        state.apply(command.into());
                        state.window.request_redraw();
                    }
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.events.modifiers_changed(map_modifiers(modifiers.state()));
            }

            _ => {}
        }

        let changes = state.canvas.drain_events();
        if needs_redraw(&changes) || egui_response.repaint {
            state.window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribble_core::tools::MarkerThickness;

    fn setup() -> (Canvas, UiState, fastrand::Rng) {
        (Canvas::new(), UiState::default(), fastrand::Rng::with_seed(7))
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Drawing App");
        assert_eq!(config.canvas_size, Size::new(256.0, 256.0));
        assert!((config.export_scale - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.canvas_config().size, config.canvas_size);
    }

    #[test]
    fn test_export_action_is_deferred() {
        let (mut canvas, mut ui_state, mut rng) = setup();
        assert!(apply_action(&mut canvas, &mut ui_state, &mut rng, UiAction::ExportPng));
        assert!(!apply_action(&mut canvas, &mut ui_state, &mut rng, UiAction::Undo));
    }

    #[test]
    fn test_place_sticker_action() {
        let (mut canvas, mut ui_state, mut rng) = setup();
        apply_action(&mut canvas, &mut ui_state, &mut rng, UiAction::PlaceSticker("⭐".into()));

        assert_eq!(canvas.document.len(), 1);
        let bounds = canvas.document.bounds();
        let drawable = &canvas.document.drawables()[0];
        let scribble_core::Drawable::Sticker(sticker) = drawable else {
            panic!("expected a sticker");
        };
        assert!(bounds.contains(sticker.position()));

        apply_action(&mut canvas, &mut ui_state, &mut rng, UiAction::Undo);
        assert!(canvas.document.is_empty());
        apply_action(&mut canvas, &mut ui_state, &mut rng, UiAction::Redo);
        assert_eq!(canvas.document.len(), 1);
    }

    #[test]
    fn test_custom_sticker_actions() {
        let (mut canvas, mut ui_state, mut rng) = setup();
        apply_action(&mut canvas, &mut ui_state, &mut rng, UiAction::OpenStickerPrompt);
        assert!(ui_state.sticker_prompt_open);

        apply_action(
            &mut canvas,
            &mut ui_state,
            &mut rng,
            UiAction::AddCustomSticker("🎉".into()),
        );
        assert_eq!(canvas.palette.len(), 4);
        assert_eq!(canvas.palette.entries()[3].name, "Custom Sticker 4");

        // Blank input leaves the palette alone.
        apply_action(
            &mut canvas,
            &mut ui_state,
            &mut rng,
            UiAction::AddCustomSticker("   ".into()),
        );
        assert_eq!(canvas.palette.len(), 4);
    }

    #[test]
    fn test_thickness_and_clear_actions() {
        let (mut canvas, mut ui_state, mut rng) = setup();
        apply_action(
            &mut canvas,
            &mut ui_state,
            &mut rng,
            UiAction::SetThickness(MarkerThickness::Thick),
        );
        assert_eq!(canvas.thickness(), MarkerThickness::Thick);

        canvas.start_stroke(Point::new(1.0, 1.0));
        canvas.extend_stroke(Point::new(2.0, 2.0));
        apply_action(&mut canvas, &mut ui_state, &mut rng, UiAction::Clear);
        assert!(canvas.document.is_empty());
        assert!(!canvas.document.can_redo());
        assert!(!canvas.is_drawing());
    }
}
