//! Transform configuration.

use rustc_hash::FxHashSet;

/// Options controlling a single template transform.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Module path of the type definitions the generated code imports.
    pub types_path: String,
    /// Type expression for the template's receiver. Defaults to `unknown`.
    pub context_type: Option<String>,
    /// Generic parameter list appended verbatim to the emitted function,
    /// e.g. `<T extends string>`.
    pub type_params: Option<String>,
    /// Raw statements spliced verbatim ahead of the generated function.
    pub preamble: Vec<String>,
    /// Names treated as already resolvable without the global fallback.
    pub identifiers_in_scope: FxHashSet<String>,
}

impl TransformOptions {
    /// Creates options with the required types module path.
    pub fn new(types_path: impl Into<String>) -> Self {
        Self {
            types_path: types_path.into(),
            context_type: None,
            type_params: None,
            preamble: Vec::new(),
            identifiers_in_scope: FxHashSet::default(),
        }
    }

    /// Sets the receiver's type expression.
    pub fn with_context_type(mut self, context_type: impl Into<String>) -> Self {
        self.context_type = Some(context_type.into());
        self
    }

    /// Sets the generic parameter list.
    pub fn with_type_params(mut self, type_params: impl Into<String>) -> Self {
        self.type_params = Some(type_params.into());
        self
    }

    /// Sets the preamble statements.
    pub fn with_preamble<I, S>(mut self, preamble: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preamble = preamble.into_iter().map(Into::into).collect();
        self
    }

    /// Marks names as statically resolvable.
    pub fn with_identifiers_in_scope<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifiers_in_scope = names.into_iter().map(Into::into).collect();
        self
    }
}
