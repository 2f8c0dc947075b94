//! Crate-level error types.

use std::fmt;

use crate::gpu::context::RenderContextError;

/// Errors produced by the isleview crate.
#[derive(Debug)]
pub enum IsleError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to load a mesh asset.
    MeshLoad(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for IsleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::MeshLoad(msg) => write!(f, "mesh load error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for IsleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for IsleError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for IsleError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
