//! Diagnostic records shared by the parser and the emitter.
//!
//! Every failure mode of the transform, syntactic or semantic, surfaces as a
//! `Diagnostic` in the result. Nothing panics across the public boundary.

use serde::Serialize;

use crate::span::Span;

/// A single problem found while transforming a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Human-readable description of the problem.
    pub message: String,
    /// The offending range in the original template source.
    pub span: Span,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}
