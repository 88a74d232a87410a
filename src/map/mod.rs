//! This module defines the level grid and provides functions for interacting with it.

pub mod builder;
pub mod parser;
