//! Core traits, settings, and module registry for biblioteca.

pub mod module;
pub mod registry;
pub mod settings;

pub use biblioteca_db::{Database, Migration};
pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
