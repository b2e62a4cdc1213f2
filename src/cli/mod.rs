pub mod analyze;
pub mod ask;
pub mod commands;
pub mod serve;

pub use commands::{Cli, Commands};
