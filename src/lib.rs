//! Biblioteca application library
//!
//! Application modules plus the bootstrap that wires storage, modules and
//! the HTTP server together.

pub mod app;
pub mod modules;

pub use app::{Application, Phase};
