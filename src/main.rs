use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use raycaster::{Config, Frame, GridMap, Session, TextureSet, TickInput};

use crate::renderer::View;
use crate::scaler::{ScaleLut, blit_nearest, build_scale_lut};

mod renderer;
mod scaler;

const TICK: Duration = Duration::from_micros(16_667);
const TEXTURE_SIZE: usize = 64;

#[derive(Parser)]
#[command(name = "raycaster", about = "First-person grid ray-caster")]
struct Cli {
    /// Map file: `.json` document or ASCII art. Defaults to the built-in level
    #[arg(long)]
    map: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Flat colours instead of textures
    #[arg(long)]
    flat: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    session: Session,
    textures: Option<TextureSet>,
    frame: Frame,
    failure: Option<raycaster::Error>,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
    show_minimap: bool,

    // Internal low-res buffer, one column per ray
    fb_small: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    // Input and fixed-step simulation
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    tick_accumulator: Duration,
}

impl App {
    fn new(session: Session, textures: Option<TextureSet>) -> Self {
        let fb_w = session.config().ray_count;
        Self {
            window: None,
            surface: None,
            session,
            textures,
            frame: Frame::default(),
            failure: None,

            frame_counter: 0,
            last_fps_print: Instant::now(),
            show_minimap: false,

            fb_small: Vec::new(),
            fb_w,
            fb_h: 0,

            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            tick_accumulator: Duration::ZERO,
        }
    }

    fn pressed(&self, keys: [KeyCode; 2]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }

    fn input(&self) -> TickInput {
        TickInput {
            move_forward: self.pressed([KeyCode::ArrowUp, KeyCode::KeyW]),
            move_backward: self.pressed([KeyCode::ArrowDown, KeyCode::KeyS]),
            turn_left: self.pressed([KeyCode::ArrowLeft, KeyCode::KeyA]),
            turn_right: self.pressed([KeyCode::ArrowRight, KeyCode::KeyD]),
        }
    }

    /// Run as many fixed ticks as have elapsed, then cast the view once.
    fn tick(&mut self) -> raycaster::Result<()> {
        // Cap the catch-up so a stalled window does not fast-forward
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;
        self.tick_accumulator += dt;

        let input = self.input();
        while self.tick_accumulator >= TICK {
            self.session.update(input);
            self.tick_accumulator -= TICK;
        }
        self.frame = self.session.cast()?;
        Ok(())
    }

    fn rebuild_internal_fb_and_lut(&mut self, dst_w: usize, dst_h: usize) {
        // Minimized: keep the old buffers until the window has an area again
        let Some(target_h) = internal_fb_height(self.fb_w, dst_w, dst_h) else {
            return;
        };
        if target_h != self.fb_h {
            self.fb_h = target_h;
            self.fb_small = vec![0u32; self.fb_w * self.fb_h];
        }
        self.scale_lut = build_scale_lut(dst_w, dst_h, self.fb_w, self.fb_h);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: raycaster::Error) {
        error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("Raycaster")
            .with_inner_size(LogicalSize::new(960.0, 600.0));

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Rc::new(w),
            Err(err) => {
                error!("create window: {err}");
                event_loop.exit();
                return;
            }
        };
        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        let surface = match surface {
            Ok(s) => s,
            Err(err) => {
                error!("softbuffer surface: {err}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.rebuild_internal_fb_and_lut(size.width as usize, size.height as usize);

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    match code {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::KeyM if !repeat => self.show_minimap = !self.show_minimap,
                        _ => {}
                    }
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.tick() {
                    self.fail(event_loop, err);
                    return;
                }

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (Some(dw), Some(dh)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return; // Minimized window, skip drawing
                };
                if let Err(err) = surface.resize(dw, dh) {
                    error!("resize surface: {err}");
                    return;
                }

                let view = View {
                    textures: self.textures.as_ref(),
                    shading: self.session.config().shading(),
                    projection_scale: self.session.config().projection_scale,
                };
                renderer::render_frame(&mut self.fb_small, self.fb_w, self.fb_h, &self.frame, &view);
                if self.show_minimap {
                    renderer::draw_minimap(
                        &mut self.fb_small,
                        self.fb_w,
                        self.fb_h,
                        self.session.map(),
                        self.session.player(),
                        &self.frame,
                        self.session.config().fov(),
                    );
                }

                let mut buf = match surface.buffer_mut() {
                    Ok(b) => b,
                    Err(err) => {
                        error!("buffer_mut: {err}");
                        return;
                    }
                };
                blit_nearest(&mut buf, dw.get() as usize, &self.fb_small, self.fb_w, &self.scale_lut);
                if let Err(err) = buf.present() {
                    error!("present: {err}");
                }

                // Log FPS
                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
                if elapsed >= 1.0 {
                    let fps = self.frame_counter as f32 / elapsed;
                    let [x, y] = self.session.player().pos;
                    info!(x, y, "FPS: {fps:.1}");
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                window.request_redraw();
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_internal_fb_and_lut(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Internal framebuffer height for a window of `dst_w`x`dst_h`. Width is
/// pinned to the ray count, height follows the window aspect. `None` while
/// either side of the window is zero.
fn internal_fb_height(fb_w: usize, dst_w: usize, dst_h: usize) -> Option<usize> {
    if dst_w == 0 || dst_h == 0 {
        return None;
    }
    let aspect = dst_w as f32 / dst_h as f32;
    Some(((fb_w as f32 / aspect).round() as usize).max(60))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let map = match &cli.map {
        Some(path) => GridMap::load(path).with_context(|| format!("loading map {}", path.display()))?,
        None => GridMap::demo(),
    };
    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let textures = (!cli.flat).then(|| {
        let max_id = map.rows().flatten().copied().max().unwrap_or(1).max(1);
        TextureSet::procedural(max_id, TEXTURE_SIZE)
    });

    let session = Session::new(map, config).context("starting session")?;
    let mut app = App::new(session, textures);

    let event_loop = EventLoop::new()?;
    // Redraws are requested continuously, Poll keeps the simulation ticking
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err).context("session aborted"),
        None => Ok(()),
    }
}
