//! Configuration module.
//!
//! Resolution order: defaults, config file, environment, command line.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{resolve, CliOverrides, ConfigError, ResolvedConfig};
