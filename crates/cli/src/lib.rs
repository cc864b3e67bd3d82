pub mod commands;
pub mod server;

pub use commands::Commands;
