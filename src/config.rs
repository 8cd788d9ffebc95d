//! Process configuration produced by the loader's `start` effect.

use crate::registry::Resources;

/// Window parameters and resource tables, read by the render phase for the
/// rest of the process.
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub resources: Resources,
}
