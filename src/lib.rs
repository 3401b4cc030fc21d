// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod clock;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod mission;
pub mod panel;
pub mod raster;
pub mod scene;
pub mod sun;
pub mod text;
pub mod timers;
pub mod view;

pub use clock::{DisplayTime, FixedClock, SystemClock, WallClock};
pub use color::{Color, Palette};
pub use command::ClockCommand;
pub use config::{CliOptions, MissionClockConfig};
pub use error::{ArgError, ClockError, CommandParseError, OverrideError, SunTimeError};
pub use geometry::{GeometryConfig, Point};
pub use mission::{ArcAlert, BlinkState, MissionPhase};
pub use sun::{AlmanacSun, SunTimeProvider, SunTimes};
pub use view::{ClockView, Waypoint};

// Standard library imports
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

// External crate imports
use pixels::{Pixels, SurfaceTexture};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use panel::ControlPanel;
use raster::Canvas;
use text::TextRenderer;

/// How often the command channel is checked while no timer is due.
const COMMAND_POLL: Duration = Duration::from_millis(100);

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Main mission clock struct - the primary public interface
#[derive(Debug, Clone)]
pub struct MissionClock {
    config: MissionClockConfig,
}

impl MissionClock {
    pub fn new(config: MissionClockConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MissionClockConfig {
        &self.config
    }

    /// Open the window and run until it is closed.
    pub fn show(&self) -> Result<(), ClockError> {
        self.run_window(None)
    }

    /// Like [`show`](Self::show), additionally applying commands sent over
    /// `receiver`.
    pub fn show_with_commands(&self, receiver: Receiver<ClockCommand>) -> Result<(), ClockError> {
        self.run_window(Some(receiver))
    }

    fn run_window(&self, mut receiver: Option<Receiver<ClockCommand>>) -> Result<(), ClockError> {
        let buffer_width = self.config.window_width as u32;
        let buffer_height = self.config.window_height as u32;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                f64::from(buffer_width),
                f64::from(buffer_height),
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        // The buffer stays at the logical size; pixels scales it to the surface.
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(buffer_width, buffer_height, surface_texture)?;

        let text = TextRenderer::discover(self.config.font_path.as_deref());
        let view = ClockView::new(&self.config, &AlmanacSun::default(), SystemClock);
        let mut app = App::new(&self.config, view, text);
        let mut cursor: Option<(f32, f32)> = None;

        event_loop.run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    tracing::info!("Window closed");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                        tracing::error!("Failed to resize surface: {e}");
                    }
                    app.needs_redraw = true;
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Some((position.x as f32, position.y as f32));
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    if let Some(Ok(pixel)) = cursor.map(|pos| pixels.window_pos_to_pixel(pos)) {
                        app.on_click(pixel);
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => app.on_key(&event),
                WindowEvent::RedrawRequested => {
                    app.render(pixels.frame_mut());
                    if let Err(e) = pixels.render() {
                        tracing::error!("Render failed: {e}");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let closed = receiver.as_ref().is_some_and(|rx| !app.drain(rx));
                if closed {
                    tracing::debug!("Command channel closed");
                    receiver = None;
                }
                app.tick();
                if app.needs_redraw {
                    window_clone.request_redraw();
                }
                window_target.set_control_flow(app.control_flow(receiver.is_some()));
            }
            _ => {}
        })?;

        Ok(())
    }
}

// ============================================================================
// INTERNAL IMPLEMENTATION
// ============================================================================

/// Everything the event loop mutates, kept free of window handles so it can
/// be driven headless.
struct App<C: WallClock = SystemClock> {
    view: ClockView<C>,
    panel: ControlPanel,
    text: TextRenderer,
    background: Vec<u8>,
    buffer_size: (usize, usize),
    canvas_origin: (i32, i32),
    canvas_size: usize,
    started: Instant,
    needs_redraw: bool,
}

impl<C: WallClock> App<C> {
    fn new(config: &MissionClockConfig, view: ClockView<C>, text: TextRenderer) -> Self {
        let buffer_size = (config.window_width, config.window_height);
        let mut app = Self {
            view,
            panel: ControlPanel::new(),
            text,
            background: vec![0; buffer_size.0 * buffer_size.1 * 4],
            buffer_size,
            canvas_origin: config.canvas_origin,
            canvas_size: config.canvas_size,
            started: Instant::now(),
            needs_redraw: true,
        };
        app.paint_background();
        app
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// Rasterize the static background once.
    fn paint_background(&mut self) {
        let mut background = std::mem::take(&mut self.background);
        {
            let mut canvas = Canvas::new(&mut background, self.buffer_size.0, self.buffer_size.1);
            canvas.clear(Color::PANEL);
            let mut face = canvas.viewport(self.canvas_origin, (self.canvas_size, self.canvas_size));
            self.view.static_background().render(&mut face, &self.text);
        }
        self.background = background;
    }

    fn apply(&mut self, command: ClockCommand, now: Duration) {
        let outcome = self.view.apply(command.clone(), now);
        self.panel.acknowledge(&command, &outcome);
        self.needs_redraw = true;
    }

    /// Apply every queued command. Returns `false` once the sender is gone.
    fn drain(&mut self, receiver: &Receiver<ClockCommand>) -> bool {
        loop {
            match receiver.try_recv() {
                Ok(command) => {
                    tracing::debug!(?command, "Command received");
                    let now = self.now();
                    self.apply(command, now);
                }
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn tick(&mut self) {
        let now = self.now();
        if self.view.advance(now) {
            self.needs_redraw = true;
        }
    }

    fn control_flow(&self, polling: bool) -> ControlFlow {
        let timer = self.view.next_deadline().map(|due| self.started + due);
        let poll = polling.then(|| Instant::now() + COMMAND_POLL);
        match [timer, poll].into_iter().flatten().min() {
            Some(at) => ControlFlow::WaitUntil(at),
            None => ControlFlow::Wait,
        }
    }

    /// Route a click in buffer pixels to the face or the panel.
    fn on_click(&mut self, (x, y): (usize, usize)) {
        let (ox, oy) = self.canvas_origin;
        let face_x = x as f64 - f64::from(ox);
        let face_y = y as f64 - f64::from(oy);
        let extent = self.canvas_size as f64;
        let command = if (0.0..extent).contains(&face_x) && (0.0..extent).contains(&face_y) {
            Some(ClockCommand::Click {
                x: face_x,
                y: face_y,
            })
        } else {
            self.panel.click(Point::new(x as f64, y as f64))
        };
        if let Some(command) = command {
            let now = self.now();
            self.apply(command, now);
        }
        self.needs_redraw = true;
    }

    fn on_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Enter) => {
                if let Some(command) = self.panel.submit() {
                    let now = self.now();
                    self.apply(command, now);
                }
            }
            Key::Named(NamedKey::Backspace) => self.panel.backspace(),
            Key::Named(NamedKey::Tab) => self.panel.cycle_focus(),
            Key::Named(NamedKey::Escape) => self.panel.blur(),
            _ => {
                if let Some(text) = &event.text {
                    self.panel.type_text(text);
                }
            }
        }
        self.needs_redraw = true;
    }

    /// Draw one frame: cached background, then the dynamic layers in order.
    fn render(&mut self, frame: &mut [u8]) {
        if frame.len() == self.background.len() {
            frame.copy_from_slice(&self.background);
        }
        let mut canvas = Canvas::new(frame, self.buffer_size.0, self.buffer_size.1);
        {
            let mut face = canvas.viewport(self.canvas_origin, (self.canvas_size, self.canvas_size));
            self.view.dynamic_arcs().render(&mut face, &self.text);
            self.view.static_overlay().render(&mut face, &self.text);
            self.view.dynamic_marks().render(&mut face, &self.text);
        }
        self.panel.scene().render(&mut canvas, &self.text);
        self.needs_redraw = false;
    }
}
