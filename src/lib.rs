//! Compiles typed templates into equivalent TypeScript.
//!
//! The transform takes template source text (markup interleaved with
//! expressions, control flow, block invocation, and slot binding) and
//! produces a snippet of TypeScript that preserves every expression's
//! type-relevant shape, so an external checker can validate the template as
//! if it were ordinary code. Alongside the code it reports inline
//! suppression/assertion directives and both syntax and semantic errors with
//! exact source spans.
//!
//! # Pipeline
//!
//! - parser: template text into a spanned AST; all-or-nothing.
//! - scope resolver: lexically nested identifier bindings during the walk.
//! - emitter: one pass over the tree producing code, the source-to-generated
//!   span map, directives, and semantic diagnostics.
//!
//! # Example
//!
//! ```
//! use weft::{TransformOptions, template_to_typescript};
//!
//! let options = TransformOptions::new("@weft/template");
//! let transformed = template_to_typescript("{{if @ready \"ok\"}}", &options);
//! let output = transformed.result.expect("template is well-formed");
//! assert!(output.code.contains("(𝚪.args.ready) ? (\"ok\") : (undefined);"));
//! ```
//!
//! The transform is deterministic and side-effect-free: identical source and
//! options produce byte-identical code, directives, mappings, and errors,
//! and distinct invocations share no state.

pub mod ast;
mod config;
mod diagnostic;
mod directive;
mod emit;
mod parser;
mod scope;
mod span;

pub use config::TransformOptions;
pub use diagnostic::Diagnostic;
pub use directive::{Directive, DirectiveKind};
pub use emit::Mapping;
pub use parser::SyntaxError;
pub use scope::{BindingKind, Resolution, ScopeStack};
pub use span::Span;

/// The outcome of one transform call.
#[derive(Debug)]
pub struct Transformed {
    /// The generated artifacts; absent on unrecoverable syntax failure.
    pub result: Option<TransformOutput>,
    /// Syntax and semantic diagnostics, in the order they were found. May be
    /// non-empty alongside a present `result` (best-effort partial emission).
    pub errors: Vec<Diagnostic>,
}

/// Generated code plus its location metadata.
#[derive(Debug)]
pub struct TransformOutput {
    /// The generated TypeScript.
    pub code: String,
    /// Directives recognized from comments, in source order.
    pub directives: Vec<Directive>,
    /// Source-span → generated-span records, in emission order.
    pub mappings: Vec<Mapping>,
}

/// Transforms template source into TypeScript.
///
/// A syntax error is terminal: `result` is `None` and `errors` holds the
/// parse diagnostic. Semantic errors are not: emission continues around each
/// offending construct, so one call can surface several independent
/// diagnostics alongside a best-effort `result`.
pub fn template_to_typescript(source: &str, options: &TransformOptions) -> Transformed {
    let body = match parser::Parser::new(source).parse() {
        Ok(body) => body,
        Err(error) => {
            return Transformed {
                result: None,
                errors: vec![error.into_diagnostic()],
            };
        }
    };
    let emission = emit::Emitter::new(options).emit(&body);
    Transformed {
        result: Some(TransformOutput {
            code: emission.code,
            directives: emission.directives,
            mappings: emission.mappings,
        }),
        errors: emission.errors,
    }
}
