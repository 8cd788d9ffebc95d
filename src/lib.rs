//! Effect host: drives a program expressed as algebraic effect values.
//!
//! The program returns a tagged value describing the next effect it wants
//! (log, load an asset, draw, present, quit). The host performs it and resumes
//! the program by applying the continuation carried in the value. A one-shot
//! loader phase builds the resource tables; a per-frame render phase draws
//! into a software canvas that a frame driver presents.

pub mod canvas;
pub mod config;
pub mod demo;
pub mod error;
pub mod font;
pub mod geometry;
pub mod input;
pub mod interp;
pub mod loader;
pub mod log;
pub mod menubar;
pub mod player;
pub mod program;
pub mod registry;
pub mod render;
pub mod settings;
pub mod sprite;
pub mod types;
pub mod value;

pub use error::{HostError, HostResult};
pub use value::{Term, Value};
