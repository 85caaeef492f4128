//! SoundWave - system audio spectrum overlay
//!
//! A borderless, transparent, always-on-top strip of bars that dance to
//! whatever the machine is playing. Drag it anywhere with the left mouse
//! button; B toggles the background panel, Escape quits.

use clap::Parser;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalPosition, LogicalSize, PhysicalSize},
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId, WindowLevel},
};

use soundwave::audio::{AudioCapture, CaptureBuffer, SpectralAnalyzer};
use soundwave::cli::Args;
use soundwave::error::ConfigError;
use soundwave::params::{AnalyzerConfig, CaptureConfig, RenderConfig};
use soundwave::pipeline::FramePipeline;
use soundwave::rendering::{RectInstance, RenderSystem};
use soundwave::visualizer::BarMapper;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    render_config: RenderConfig,
    show_background: bool,

    // Audio → bars
    pipeline: FramePipeline,

    /// Capture stream (None in demo mode)
    audio: Option<AudioCapture>,

    // Frame pacing
    next_frame: Instant,
}

impl App {
    fn new(args: &Args) -> Result<Self, ConfigError> {
        let capture_config = CaptureConfig::default();
        let analyzer_config = AnalyzerConfig::default();
        let visualizer_config = args.visualizer_config();
        let render_config = args.render_config();

        capture_config.validate()?;
        analyzer_config.validate()?;
        analyzer_config.validate_against(&capture_config)?;

        let audio = if args.demo {
            info!("Demo mode requested, skipping audio capture");
            None
        } else {
            let buffer = CaptureBuffer::new(capture_config.buffer_capacity);
            match AudioCapture::initialize(&capture_config, buffer) {
                Ok(audio) => {
                    info!(
                        "Spectrum: {} bins, {:.1} Hz per bin",
                        analyzer_config.spectrum_len(),
                        analyzer_config.bin_to_hz(1, audio.sample_rate())
                    );
                    Some(audio)
                }
                Err(e) => {
                    warn!("Audio init failed ({}), running in demo mode", e);
                    None
                }
            }
        };

        let mapper = BarMapper::new(
            visualizer_config,
            render_config.window_width as f32,
            render_config.window_height as f32,
        )?;
        let pipeline = FramePipeline::new(
            audio.as_ref().map(|audio| audio.buffer().clone()),
            SpectralAnalyzer::new(analyzer_config),
            mapper,
        );

        Ok(Self {
            window: None,
            render_system: None,
            show_background: render_config.show_background,
            render_config,
            pipeline,
            audio,
            next_frame: Instant::now(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Some(render_system) = &mut self.render_system {
            render_system.resize(size.width, size.height);
        }
        self.pipeline.resize(size.width as f32, size.height as f32);
    }

    /// Place the window centred above the bottom edge of its monitor
    fn position_window(&self, window: &Window) {
        let Some(monitor) = window.current_monitor() else {
            return;
        };
        let scale = monitor.scale_factor();
        let size: LogicalSize<u32> = monitor.size().to_logical(scale);
        let origin: LogicalPosition<i32> = monitor.position().to_logical(scale);

        let (x, y) = self.render_config.initial_position(size.width, size.height);
        window.set_outer_position(LogicalPosition::new(origin.x + x, origin.y + y));
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        let bars = self.pipeline.tick();

        let mut rects = Vec::with_capacity(bars.len() + 1);
        if self.show_background {
            let (width, height) = render_system.size();
            rects.push(RectInstance::fill(
                width as f32,
                height as f32,
                self.render_config.background,
            ));
        }
        rects.extend(bars.iter().map(RectInstance::from));

        match render_system.render(&rects) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create overlay window
        let window_attributes = Window::default_attributes()
            .with_title("SoundWave")
            .with_inner_size(LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ))
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop);

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.position_window(&window);

        // Initialize rendering system
        let render_system = match pollster::block_on(RenderSystem::new(Arc::clone(&window))) {
            Ok(render_system) => render_system,
            Err(e) => {
                error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        info!(
            "SoundWave is running (source: {}). Drag to move, B toggles background, Esc quits",
            match &self.audio {
                Some(audio) => audio.device_name(),
                None => "demo",
            }
        );

        let size = window.inner_size();
        self.render_system = Some(render_system);
        self.window = Some(window);
        self.resize(size);
        self.next_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::KeyB => {
                    self.show_background = !self.show_background;
                    debug!("Background panel: {}", self.show_background);
                }
                _ => {}
            },
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(window) = &self.window {
                    if let Err(e) = window.drag_window() {
                        debug!("Window drag unavailable: {}", e);
                    }
                }
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        let now = Instant::now();
        if now >= self.next_frame {
            window.request_redraw();
            self.next_frame += self.render_config.frame_interval();
            // Fell behind (e.g. while dragging): resync instead of bursting
            if self.next_frame < now {
                self.next_frame = now + self.render_config.frame_interval();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut app = match App::new(&args) {
        Ok(app) => app,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {}", e);
    }
}
