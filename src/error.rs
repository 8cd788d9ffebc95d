//! Host error types.
//!
//! Every failure is fatal at the process boundary; these types only carry
//! enough context for the one `ERROR:` line printed before exiting.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// A discriminant outside the phase's closed vocabulary.
    #[error("unknown {phase} effect discriminant {discriminant}")]
    Protocol {
        phase: &'static str,
        discriminant: usize,
    },

    #[error("{phase} effect `{effect}` expects {expected} fields, found {found}")]
    Arity {
        phase: &'static str,
        effect: &'static str,
        expected: usize,
        found: usize,
    },

    /// A value did not have the scalar or structural shape the host asked for.
    #[error("expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: String,
    },

    #[error("field {index} out of range for a value with {arity} fields")]
    MissingField { index: usize, arity: usize },

    #[error("{handle} is not a registered {kind} handle")]
    UnknownHandle { kind: &'static str, handle: i64 },

    #[error("invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: String },

    #[error("failed to load {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: ResourceError,
    },
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("font parse error: {0}")]
    Font(String),
}

impl HostError {
    pub fn resource(path: impl Into<PathBuf>, source: impl Into<ResourceError>) -> Self {
        HostError::Resource {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn shape(expected: &'static str, found: impl std::fmt::Debug) -> Self {
        HostError::Shape {
            expected,
            found: format!("{found:?}"),
        }
    }
}

pub type HostResult<T> = Result<T, HostError>;
