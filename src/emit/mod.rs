//! The code emitter.
//!
//! One deterministic pass over the template AST: every construct kind maps
//! to exactly one generated shape, identifier roots resolve through the
//! scope stack, comment nodes feed the directive collector, and semantic
//! failures land in the diagnostics list while emission continues around
//! the offending construct wherever structurally possible.

mod buffer;
mod element;
mod expr;
#[cfg(test)]
mod tests;

pub use buffer::Mapping;

use tracing::{debug, trace};

use crate::ast::{
    BlockParam, BlockStatement, CommentNode, Expression, Literal, LiteralValue, MustacheStatement,
    Node,
};
use crate::config::TransformOptions;
use crate::diagnostic::Diagnostic;
use crate::directive::{Directive, MarkerScan, scan_marker};
use crate::scope::ScopeStack;
use crate::span::Span;

use buffer::OutputBuffer;
use expr::{MustachePosition, is_special_form, is_valid_identifier, json_string};

const INDENT: &str = "  ";

/// Everything one emission pass produces.
#[derive(Debug)]
pub struct Emission {
    pub code: String,
    pub directives: Vec<Directive>,
    pub mappings: Vec<Mapping>,
    pub errors: Vec<Diagnostic>,
}

/// The single-pass emitter. All state lives for one transform call.
pub struct Emitter<'a> {
    options: &'a TransformOptions,
    buf: OutputBuffer,
    scope: ScopeStack,
    errors: Vec<Diagnostic>,
    directives: Vec<Directive>,
    /// Extra indentation depth for expression text built ahead of the lines
    /// that will carry it, e.g. attribute values.
    extra_indent: usize,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a TransformOptions) -> Self {
        Self {
            options,
            buf: OutputBuffer::new(),
            scope: ScopeStack::new(),
            errors: Vec::new(),
            directives: Vec::new(),
            extra_indent: 0,
        }
    }

    /// Emits the wrapper and the template body.
    pub fn emit(mut self, body: &[Node]) -> Emission {
        let types = json_string(&self.options.types_path);
        let type_params = self.options.type_params.clone().unwrap_or_default();
        let context_type = self
            .options
            .context_type
            .clone()
            .unwrap_or_else(|| "unknown".into());

        self.buf.line("(() => {");
        self.buf.indent();
        for statement in &self.options.preamble {
            self.buf.line(statement);
        }
        self.buf.line(&format!("let χ!: typeof import({types});"));
        self.buf.line(&format!(
            "return χ.template(function{type_params}(𝚪: import({types}).ResolveContext<{context_type}>) {{"
        ));
        self.buf.indent();
        self.emit_statements(body);
        self.buf.line("𝚪;");
        self.buf.dedent();
        self.buf.line("});");
        self.buf.dedent();
        self.buf.raw("})()");

        let (code, mappings) = self.buf.finish();
        debug!(
            errors = self.errors.len(),
            directives = self.directives.len(),
            "template emitted"
        );
        Emission {
            code,
            directives: self.directives,
            mappings,
            errors: self.errors,
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Emits a children list, routing comments through the directive
    /// collector with their next significant sibling.
    fn emit_statements(&mut self, nodes: &[Node]) {
        for (i, node) in nodes.iter().enumerate() {
            match node {
                Node::Text(_) => {}
                Node::Comment(comment) => {
                    self.collect_directive(comment, next_significant_span(nodes, i + 1));
                }
                _ => self.emit_statement(node),
            }
        }
    }

    fn emit_statement(&mut self, node: &Node) {
        let record = self.buf.begin_mapping(node.span());
        match node {
            Node::Mustache(mustache) => self.emit_mustache_statement(mustache),
            Node::Block(block) => self.emit_block_statement(block),
            Node::Element(element) => self.emit_element(element),
            Node::Text(_) | Node::Comment(_) => {}
        }
        self.buf.finish_mapping(record);
    }

    fn emit_mustache_statement(&mut self, mustache: &MustacheStatement) {
        if let Some(name) = self.unscoped_keyword(&mustache.call.callee) {
            if name == "yield" {
                return self.emit_yield_statement(mustache);
            }
            if is_special_form(&name) {
                if let Some(text) = self.special_form_text(&name, &mustache.call, mustache.span) {
                    self.buf.line(&format!("{text};"));
                }
                return;
            }
        }
        let value = self.mustache_value(mustache, MustachePosition::Statement);
        self.buf.line(&format!("{value};"));
    }

    /// `{{yield ...}}`, legal only as a top-level statement.
    fn emit_yield_statement(&mut self, mustache: &MustacheStatement) {
        let mut block_name = "default".to_string();
        for pair in &mustache.call.hash {
            if pair.key != "to" {
                continue;
            }
            match &pair.value {
                Expression::Literal(Literal {
                    value: LiteralValue::String(name),
                    ..
                }) => {
                    // `inverse` is a legacy alias for the else block.
                    block_name = if name == "inverse" {
                        "else".to_string()
                    } else {
                        name.clone()
                    };
                }
                _ => {
                    self.semantic_error(
                        "Named block {{yield}}s must have a literal block name",
                        mustache.span,
                    );
                    return;
                }
            }
        }
        let mut out = format!("χ.yieldToBlock(𝚪, {}", json_string(&block_name));
        for param in &mustache.call.params {
            let value = self.expression_text(param);
            out.push_str(", ");
            out.push_str(&value);
        }
        out.push_str(");");
        self.buf.line(&out);
    }

    fn emit_block_statement(&mut self, block: &BlockStatement) {
        if let Some(name) = self.unscoped_keyword(&block.call.callee) {
            if name == "if" || name == "unless" {
                return self.emit_block_conditional(block, &name);
            }
        }
        self.emit_block_invocation(block);
    }

    /// `{{#if}}`/`{{#unless}}` compile to an `if`/`else` statement chain;
    /// chained `{{else ...}}` clauses arrive as a nested block statement in
    /// the inverse and emit inside the `else` braces.
    fn emit_block_conditional(&mut self, block: &BlockStatement, name: &str) {
        if block.call.params.len() != 1 {
            self.semantic_error(
                format!("{{{{#{name}}}}} requires exactly one condition"),
                block.span,
            );
            return;
        }
        let condition = self.expression_text(&block.call.params[0]);
        let test = if name == "unless" {
            format!("!({condition})")
        } else {
            condition
        };
        self.buf.line(&format!("if ({test}) {{"));
        self.buf.indent();
        self.emit_statements(&block.program);
        self.buf.dedent();
        if let Some(inverse) = &block.inverse {
            self.buf.line("} else {");
            self.buf.indent();
            self.emit_statements(inverse);
            self.buf.dedent();
        }
        self.buf.line("}");
    }

    fn emit_block_invocation(&mut self, block: &BlockStatement) {
        if !self.check_block_params(&block.block_params, block.span) {
            return;
        }
        self.buf.line("{");
        self.buf.indent();
        let path = self.path_text(&block.path);
        let invocation = self.resolve_call_text(&block.call);
        self.buf
            .line(&format!("const 𝛄 = χ.emitComponent({invocation});"));

        let names: Vec<&str> = block.block_params.iter().map(|p| p.name.as_str()).collect();
        self.buf.line("{");
        self.buf.indent();
        self.buf
            .line(&format!("const [{}] = 𝛄.blockParams.default;", names.join(", ")));
        self.scope.enter(names);
        self.emit_statements(&block.program);
        self.scope.leave();
        self.buf.dedent();
        self.buf.line("}");

        if let Some(inverse) = &block.inverse {
            self.buf.line("{");
            self.buf.indent();
            self.buf.line("const [] = 𝛄.blockParams.else;");
            self.emit_statements(inverse);
            self.buf.dedent();
            self.buf.line("}");
        }

        // Mirror the close tag so its path participates in checking.
        self.buf.line(&format!("{path};"));
        self.buf.dedent();
        self.buf.line("}");
    }

    // ------------------------------------------------------------------
    // Shared checks and sinks
    // ------------------------------------------------------------------

    /// Validates block-param names. A violation is terminal for the
    /// declaring construct: the diagnostic spans the construct and none of
    /// the names enter any scope frame.
    fn check_block_params(&mut self, params: &[BlockParam], span: Span) -> bool {
        if params.iter().all(|p| is_valid_identifier(&p.name)) {
            return true;
        }
        self.semantic_error("Block params must be valid TypeScript identifiers", span);
        false
    }

    /// Records a directive from a comment node, or the unknown-directive
    /// diagnostic. `area` is the next significant sibling's span; a
    /// directive with no following sibling governs its own span.
    fn collect_directive(&mut self, comment: &CommentNode, area: Option<Span>) {
        match scan_marker(&comment.value) {
            MarkerScan::NotADirective => {}
            MarkerScan::Known(kind) => {
                trace!(kind = ?kind, "collected directive");
                self.directives.push(Directive {
                    kind,
                    span: comment.span,
                    area_of_effect: area.unwrap_or(comment.span),
                });
            }
            MarkerScan::Unknown(word) => {
                self.semantic_error(format!("Unknown directive {word}"), comment.span);
            }
        }
    }

    fn semantic_error(&mut self, message: impl Into<String>, span: Span) {
        let message = message.into();
        trace!(%message, start = span.start, end = span.end, "semantic error");
        self.errors.push(Diagnostic::new(message, span));
    }
}

/// The span of the next sibling that is neither a comment nor
/// whitespace-only text; text spans are trimmed.
fn next_significant_span(nodes: &[Node], from: usize) -> Option<Span> {
    nodes
        .get(from..)?
        .iter()
        .find(|n| !matches!(n, Node::Comment(_)) && !n.is_whitespace())
        .map(|n| n.report_span())
}
