//! Configuration management for pathgate
//!
//! `GatewayConfig` describes where the pathfinder source and binary live,
//! how to compile it, and how long each step may take. `GatewayConfigLoader`
//! assembles it from defaults, a JSON file, environment variables and
//! command-line overrides.

pub mod config;
pub mod loader;

pub use config::*;
pub use loader::*;
