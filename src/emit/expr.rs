//! Expression emission.
//!
//! One deterministic rule per expression kind. Everything here returns the
//! generated text as a string; statement-level layout lives in the walk.

use crate::ast::{Call, Expression, HashPair, Literal, LiteralValue, MustacheStatement, PathExpression, PathHead};
use crate::scope::Resolution;
use crate::span::Span;

use super::{Emitter, INDENT};

/// Where a mustache's value lands in the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MustachePosition {
    /// A top-level statement (including block bodies).
    Statement,
    /// An attribute value or string interpolation.
    Attribute,
    /// A component argument value.
    Argument,
}

impl Emitter<'_> {
    /// Emits an expression in subexpression/argument position.
    pub(super) fn expression_text(&mut self, expr: &Expression) -> String {
        match expr {
            Expression::Literal(l) => literal_text(l),
            Expression::Path(p) => self.path_text(p),
            Expression::SubExpression(s) => {
                if let Some(name) = self.unscoped_keyword(&s.call.callee) {
                    if name == "yield" {
                        self.semantic_error(
                            "{{yield}} may only appear as a top-level statement",
                            s.span,
                        );
                        return "undefined".into();
                    }
                    if is_special_form(&name) {
                        return self
                            .special_form_text(&name, &s.call, s.span)
                            .unwrap_or_else(|| "undefined".into());
                    }
                }
                self.resolve_call_text(&s.call)
            }
        }
    }

    /// Emits a mustache according to its position.
    pub(super) fn mustache_value(
        &mut self,
        mustache: &MustacheStatement,
        pos: MustachePosition,
    ) -> String {
        if let Some(name) = self.unscoped_keyword(&mustache.call.callee) {
            if name == "yield" {
                self.semantic_error(
                    "{{yield}} may only appear as a top-level statement",
                    mustache.span,
                );
                return "undefined".into();
            }
            if is_special_form(&name) {
                return self
                    .special_form_text(&name, &mustache.call, mustache.span)
                    .unwrap_or_else(|| "undefined".into());
            }
        }

        let bare = mustache.call.params.is_empty() && mustache.call.hash.is_empty();
        match (&mustache.call.callee, bare) {
            (Expression::Literal(l), true) => literal_text(l),
            (Expression::Path(p), true) => {
                let path = self.path_text(p);
                match pos {
                    MustachePosition::Argument => path,
                    _ => format!("χ.emitValue(χ.resolveOrReturn({path})({{}}))"),
                }
            }
            _ => {
                let call = self.resolve_call_text(&mustache.call);
                match pos {
                    MustachePosition::Argument => call,
                    _ => format!("χ.emitValue({call})"),
                }
            }
        }
    }

    /// `χ.resolve(callee)({named}, positional...)`. The named-arguments
    /// object always evaluates first, then positional arguments in source
    /// order.
    pub(super) fn resolve_call_text(&mut self, call: &Call) -> String {
        let callee = self.expression_text(&call.callee);
        let named = self.named_args_text(&call.hash);
        let mut out = format!("χ.resolve({callee})({named}");
        for param in &call.params {
            out.push_str(", ");
            out.push_str(&self.expression_text(param));
        }
        out.push(')');
        out
    }

    /// The inline named-arguments object, `{}` or `{ a: 1, b: "ok" }`.
    pub(super) fn named_args_text(&mut self, hash: &[HashPair]) -> String {
        if hash.is_empty() {
            return "{}".into();
        }
        let pairs: Vec<String> = hash
            .iter()
            .map(|pair| {
                let value = self.expression_text(&pair.value);
                format!("{}: {}", key_text(&pair.key), value)
            })
            .collect();
        format!("{{ {} }}", pairs.join(", "))
    }

    /// Emits a path, resolving the root through the scope stack.
    ///
    /// The root is accessed directly; tail segments chain optionally. The
    /// first segment after `this` or an `@arg` head joins plainly, since the
    /// receiver and its argument record are always present.
    pub(super) fn path_text(&mut self, path: &PathExpression) -> String {
        let mut plain_next = false;
        let mut out = match &path.head {
            PathHead::This => {
                plain_next = true;
                "𝚪.this".to_string()
            }
            PathHead::Argument(name) => format!("𝚪.args{}", join_segment(name, false)),
            PathHead::Ident(name) => {
                let declared = &self.options.identifiers_in_scope;
                match self.scope.resolve(name, declared) {
                    Resolution::Bound(_) | Resolution::Declared(_) => name.clone(),
                    Resolution::External(free) => {
                        format!("χ.Globals[{}]", json_string(free))
                    }
                }
            }
        };
        for segment in &path.tail {
            out.push_str(&join_segment(segment, !plain_next));
            plain_next = false;
        }
        out
    }

    /// Emits `if`/`unless`/`array`/`hash`, or records the construct's fixed
    /// arity diagnostic and returns `None`.
    pub(super) fn special_form_text(
        &mut self,
        name: &str,
        call: &Call,
        span: Span,
    ) -> Option<String> {
        match name {
            "if" | "unless" => {
                if call.params.len() < 2 {
                    self.semantic_error(
                        format!("{{{{{name}}}}} requires at least two parameters"),
                        span,
                    );
                    return None;
                }
                let condition = self.expression_text(&call.params[0]);
                let consequent = self.expression_text(&call.params[1]);
                let alternate = call
                    .params
                    .get(2)
                    .map(|p| self.expression_text(p))
                    .unwrap_or_else(|| "undefined".into());
                let test = if name == "unless" {
                    format!("!({condition})")
                } else {
                    format!("({condition})")
                };
                Some(format!("{test} ? ({consequent}) : ({alternate})"))
            }
            "array" => {
                if !call.hash.is_empty() {
                    self.semantic_error("{{array}} only accepts positional parameters", span);
                    return None;
                }
                let elements: Vec<String> =
                    call.params.iter().map(|p| self.expression_text(p)).collect();
                Some(format!("[{}]", elements.join(", ")))
            }
            "hash" => {
                if !call.params.is_empty() {
                    self.semantic_error("{{hash}} only accepts named parameters", span);
                    return None;
                }
                Some(self.hash_literal_text(&call.hash))
            }
            _ => None,
        }
    }

    /// An object literal preserving source key order: `{}` when empty, a
    /// parenthesized multi-line literal otherwise.
    fn hash_literal_text(&mut self, hash: &[HashPair]) -> String {
        if hash.is_empty() {
            return "{}".into();
        }
        let level = self.buf.level() + self.extra_indent;
        let outer = INDENT.repeat(level);
        let inner = INDENT.repeat(level + 1);
        let mut out = String::from("({\n");
        self.extra_indent += 1;
        for pair in hash {
            let value = self.expression_text(&pair.value);
            out.push_str(&format!("{inner}{}: {value},\n", key_text(&pair.key)));
        }
        self.extra_indent -= 1;
        out.push_str(&format!("{outer}}})"));
        out
    }

    /// The bare identifier of `expr` when it is an unscoped keyword-capable
    /// path head; names bound in scope are never treated as keywords.
    pub(super) fn unscoped_keyword(&self, expr: &Expression) -> Option<String> {
        let Expression::Path(path) = expr else {
            return None;
        };
        let name = path.bare_ident()?;
        match self
            .scope
            .resolve(name, &self.options.identifiers_in_scope)
        {
            Resolution::External(_) => Some(name.to_string()),
            _ => None,
        }
    }
}

pub(super) fn is_special_form(name: &str) -> bool {
    matches!(name, "if" | "unless" | "array" | "hash")
}

/// Literal expressions pass through as literal text.
pub(super) fn literal_text(literal: &Literal) -> String {
    match &literal.value {
        LiteralValue::Boolean(b) => b.to_string(),
        LiteralValue::Null => "null".into(),
        LiteralValue::Undefined => "undefined".into(),
        LiteralValue::Number(text) => text.clone(),
        LiteralValue::String(text) => json_string(text),
    }
}

/// One `.`/`?.` (or computed) join in an emitted path.
pub(super) fn join_segment(segment: &str, optional: bool) -> String {
    if is_safe_key(segment) {
        if optional {
            format!("?.{segment}")
        } else {
            format!(".{segment}")
        }
    } else if optional {
        format!("?.[{}]", json_string(segment))
    } else {
        format!("[{}]", json_string(segment))
    }
}

/// An object key, quoted only when it is not a bare-safe identifier.
pub(super) fn key_text(key: &str) -> String {
    if is_safe_key(key) {
        key.to_string()
    } else {
        json_string(key)
    }
}

/// Whether `name` can appear after `.` or as a bare object key.
pub(super) fn is_safe_key(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Block params become plain `const` bindings, so they must be valid
/// TypeScript identifiers.
pub(super) fn is_valid_identifier(name: &str) -> bool {
    is_safe_key(name)
}

/// Double-quoted JSON-style string serialization.
pub(super) fn json_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escapes static text for inclusion in a template literal.
pub(super) fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}
