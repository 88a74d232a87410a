//! Simulation and rendering systems.
//!
//! All mutable game state lives in resources on one `World`; each module here owns a slice
//! of that state and the systems that advance it.

pub mod ambient;
pub mod audio;
pub mod battery;
pub mod collision;
pub mod components;
pub mod enemy;
pub mod hud;
pub mod interact;
pub mod objects;
pub mod player;
pub mod render;
pub mod state;

pub use self::ambient::*;
pub use self::audio::*;
pub use self::battery::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::enemy::*;
pub use self::hud::*;
pub use self::interact::*;
pub use self::objects::*;
pub use self::player::*;
pub use self::render::{overlay_render_system, sprite_render_system, wall_render_system, DepthBuffer, Framebuffer};
pub use self::state::*;
