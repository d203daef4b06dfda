//! Configuration for the Song of the Week client.
//!
//! Defaults are layered with an optional TOML file, a `.env` file and the
//! process environment (highest precedence). The loader is pure over an
//! environment lookup so it can be exercised without touching process state.

pub mod error;
pub mod loader;
pub mod models;
pub mod util;

pub use error::ConfigError;
pub use loader::{ConfigLoader, EnvLookup};
pub use models::{ClientConfig, RouteConfig};
