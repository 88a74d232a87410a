use std::collections::HashMap;
use std::time::{Duration, Instant};

use glam::Vec2;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::{EventPump, Sdl};
use tracing::{debug, info, trace, warn};

use crate::constants::LOOP_TIME;
use crate::error::{GameError, GameResult};
use crate::events::GameCommand;
use crate::game::{Game, GameConfig};
use crate::platform;
use crate::systems::{Actions, PlayerInput};

/// Radians of turn per pixel of relative mouse motion.
const MOUSE_SENSITIVITY: f32 = 0.0025;

/// How often the window title is refreshed with HUD stats.
const TITLE_INTERVAL: Duration = Duration::from_millis(250);

/// What a key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Held for as long as the key is down.
    Action(Actions),
    Command(GameCommand),
}

/// The rebindable key table.
#[derive(Debug, Clone)]
pub struct Bindings {
    keys: HashMap<Keycode, Binding>,
}

impl Default for Bindings {
    fn default() -> Self {
        let mut keys = HashMap::new();

        // Movement
        keys.insert(Keycode::W, Binding::Action(Actions::FORWARD));
        keys.insert(Keycode::Up, Binding::Action(Actions::FORWARD));
        keys.insert(Keycode::S, Binding::Action(Actions::BACK));
        keys.insert(Keycode::Down, Binding::Action(Actions::BACK));
        keys.insert(Keycode::A, Binding::Action(Actions::STRAFE_LEFT));
        keys.insert(Keycode::D, Binding::Action(Actions::STRAFE_RIGHT));
        keys.insert(Keycode::LShift, Binding::Action(Actions::RUN));
        keys.insert(Keycode::LCtrl, Binding::Action(Actions::SNEAK));
        keys.insert(Keycode::C, Binding::Action(Actions::SNEAK));

        // Actions
        keys.insert(Keycode::E, Binding::Action(Actions::INTERACT));
        keys.insert(Keycode::F, Binding::Action(Actions::ATTACK));

        keys.insert(Keycode::M, Binding::Command(GameCommand::MuteAudio));
        keys.insert(Keycode::Escape, Binding::Command(GameCommand::Exit));

        Self { keys }
    }
}

impl Bindings {
    pub fn bind(&mut self, key: Keycode, binding: Binding) {
        self.keys.insert(key, binding);
    }

    pub fn get(&self, key: Keycode) -> Option<Binding> {
        self.keys.get(&key).copied()
    }
}

/// Main application wrapper that manages SDL initialization, window lifecycle, and the game loop.
pub struct App {
    pub game: Game,
    canvas: Canvas<Window>,
    event_pump: EventPump,
    frame: Texture<'static>,
    bindings: Bindings,
    /// Actions currently held down.
    held: Actions,
    /// Edge-triggered actions pressed since the last tick.
    pressed: Actions,
    look: Vec2,
    focused: bool,
    last_title: Instant,
    // Keep SDL alive for the app lifetime
    _sdl_context: Sdl,
}

impl App {
    /// Initializes SDL, creates the window and streaming frame texture, and builds the game.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Sdl` if any SDL initialization step fails, or propagates
    /// errors from `Game::new()`.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        info!("Initializing SDL2 application");
        let canvas_size = config.canvas;
        let sdl_context = sdl2::init().map_err(|e| GameError::Sdl(e.to_string()))?;
        let video_subsystem = sdl_context.video().map_err(|e| GameError::Sdl(e.to_string()))?;
        let event_pump = sdl_context.event_pump().map_err(|e| GameError::Sdl(e.to_string()))?;

        trace!(width = canvas_size.x, height = canvas_size.y, "Creating game window");
        let window = video_subsystem
            .window("Hollow", canvas_size.x, canvas_size.y)
            .resizable()
            .position_centered()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        let mut canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        canvas
            .set_logical_size(canvas_size.x, canvas_size.y)
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        debug!(renderer_info = ?canvas.info(), "Canvas renderer initialized");

        sdl_context.mouse().set_relative_mouse_mode(true);

        let texture_creator: &'static TextureCreator<WindowContext> = Box::leak(Box::new(canvas.texture_creator()));
        let frame = texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, canvas_size.x, canvas_size.y)
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        let game = Game::new(config)?;

        info!("Application initialization completed successfully");
        Ok(App {
            game,
            canvas,
            event_pump,
            frame,
            bindings: Bindings::default(),
            held: Actions::empty(),
            pressed: Actions::empty(),
            look: Vec2::ZERO,
            focused: true,
            last_title: Instant::now(),
            _sdl_context: sdl_context,
        })
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    fn handle_events(&mut self) {
        let edge_actions = Actions::INTERACT | Actions::ATTACK;

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.game.command(GameCommand::Exit),
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::FocusGained => self.focused = true,
                    WindowEvent::FocusLost => {
                        self.focused = false;
                        self.held = Actions::empty();
                    }
                    _ => {}
                },
                Event::MouseMotion { xrel, yrel, .. } => {
                    self.look += Vec2::new(xrel as f32, -yrel as f32) * MOUSE_SENSITIVITY;
                }
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => match self.bindings.get(key) {
                    Some(Binding::Action(action)) if edge_actions.contains(action) => self.pressed.insert(action),
                    Some(Binding::Action(action)) => self.held.insert(action),
                    Some(Binding::Command(command)) => self.game.command(command),
                    None => {}
                },
                Event::KeyUp {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    if let Some(Binding::Action(action)) = self.bindings.get(key) {
                        self.held.remove(action);
                    }
                }
                _ => {}
            }
        }
    }

    fn present(&mut self) -> GameResult<()> {
        let framebuffer = self.game.framebuffer();
        let row_len = framebuffer.width() as usize;
        let pixels = framebuffer.pixels();

        self.frame
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                for (y, row) in pixels.chunks_exact(row_len).enumerate() {
                    let line = &mut buffer[y * pitch..y * pitch + row_len * 4];
                    for (dst, pixel) in line.chunks_exact_mut(4).zip(row) {
                        dst.copy_from_slice(&pixel.to_ne_bytes());
                    }
                }
            })
            .map_err(GameError::Sdl)?;

        self.canvas.copy(&self.frame, None, None).map_err(GameError::Sdl)?;
        self.canvas.present();
        Ok(())
    }

    fn update_title(&mut self) {
        if self.last_title.elapsed() < TITLE_INTERVAL {
            return;
        }
        self.last_title = Instant::now();

        let stats = self.game.snapshot();
        let mut title = format!(
            "Hollow | battery {}% | keys {}/{} | noise {:.0}%",
            stats.battery_percent,
            stats.keys_found,
            stats.keys_required,
            stats.noise_level * 100.0
        );
        if let Some(message) = &stats.message {
            title.push_str(" | ");
            title.push_str(message);
        }
        if let Some(note) = stats.note {
            title.push_str(" | ");
            title.push_str(note);
        }

        if let Err(e) = self.canvas.window_mut().set_title(&title) {
            warn!("Failed to set window title: {e}");
        }
    }

    /// Executes a single frame: input, one simulation tick, present, then sleep out the frame.
    ///
    /// # Returns
    ///
    /// `true` if the game should continue running, `false` if the game requested exit.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        self.handle_events();
        self.game.set_input(PlayerInput {
            actions: self.held | self.pressed,
            look: self.look,
        });
        self.pressed = Actions::empty();
        self.look = Vec2::ZERO;

        if self.game.tick() {
            info!("Exit requested");
            return false;
        }

        if let Err(e) = self.present() {
            warn!("Failed to present frame: {e}");
        }
        self.update_title();

        if start.elapsed() < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                platform::sleep(time, self.focused);
            }
        } else {
            trace!(behind = ?(start.elapsed() - LOOP_TIME), "Frame over budget");
        }

        true
    }
}
