mod config;
mod workspace;
pub mod zorder;

pub use config::*;
pub use workspace::*;
