//! Hollow: a first-person survival-horror simulation with a raycasting renderer.

#[cfg(feature = "desktop")]
pub mod app;
pub mod args;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod map;
pub mod platform;
pub mod systems;
pub mod texture;
