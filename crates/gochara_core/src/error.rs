//! Coordinator error type.

use thiserror::Error;

use crate::backend::BackendError;
use crate::body::Body;

/// Errors surfaced by [`crate::EngineHandle`].
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The engine itself failed. Carries the engine's message plus the
    /// operation and body being processed.
    #[error("engine {operation} failed{}: {message}", body_suffix(.body))]
    Backend {
        operation: &'static str,
        body: Option<Body>,
        message: String,
    },
    /// Body outside the supported safelist, or an unknown code.
    #[error("unsupported body code {code}")]
    UnsupportedBody { code: i32 },
    /// Request rejected before reaching the engine.
    #[error("invalid engine query: {0}")]
    InvalidQuery(&'static str),
}

impl EngineError {
    pub(crate) fn backend(operation: &'static str, body: Option<Body>, err: BackendError) -> Self {
        Self::Backend {
            operation,
            body,
            message: err.0,
        }
    }
}

fn body_suffix(body: &Option<Body>) -> String {
    match body {
        Some(b) => format!(" for {b}"),
        None => String::new(),
    }
}
