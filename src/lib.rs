pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod forecast;
pub mod learning;
pub mod simulation;
pub mod stock;

pub use error::{Error, Result};

pub type Int = i32;

/// Hours in one episode.
pub const NUM_HOURS: usize = 24;
/// Zero-indexed terminal hour of an episode.
pub const LAST_HOUR: usize = NUM_HOURS - 1;
