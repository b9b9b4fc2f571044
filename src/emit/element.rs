//! Element and component emission.
//!
//! Elements open a nested emission scope: the tag becomes an
//! `emitElement`/`emitComponent` call bound to `𝛄`, attributes and
//! modifiers apply against `𝛄.element`, and child content lands either
//! inline (plain elements) or inside `blockParams` destructuring scopes
//! (component invocations).

use indexmap::IndexMap;

use crate::ast::{
    AttrValue, ConcatPart, ConcatValue, ElementKind, ElementNode, ElementPart, Node,
    PathExpression, PathHead, TagName,
};
use crate::span::Span;

use super::expr::{
    MustachePosition, escape_template_literal, join_segment, json_string, key_text,
};
use super::{Emitter, next_significant_span};

impl Emitter<'_> {
    pub(super) fn emit_element(&mut self, element: &ElementNode) {
        match element.kind() {
            ElementKind::NamedBlock => {
                // Only meaningful as an immediate child of a component
                // invocation, where the component emission consumes it.
                self.semantic_error("Unexpected named block", element.span);
            }
            ElementKind::Plain => self.emit_plain_element(element),
            ElementKind::Component => self.emit_component(element),
        }
    }

    fn emit_plain_element(&mut self, element: &ElementNode) {
        if !self.check_block_params(&element.block_params, element.span) {
            return;
        }
        self.buf.line("{");
        self.buf.indent();
        self.buf.line(&format!(
            "const 𝛄 = χ.emitElement({});",
            json_string(&element.tag.name)
        ));
        self.emit_element_parts(element);
        self.emit_statements(&element.children);
        self.buf.dedent();
        self.buf.line("}");
    }

    fn emit_component(&mut self, element: &ElementNode) {
        if !self.check_block_params(&element.block_params, element.span) {
            return;
        }
        let path = tag_path(&element.tag);
        self.buf.line("{");
        self.buf.indent();
        let path_text = self.path_text(&path);
        let args = self.component_args_text(element);
        self.buf.line(&format!(
            "const 𝛄 = χ.emitComponent(χ.resolve({path_text})({args}));"
        ));
        self.emit_element_parts(element);

        if !element.self_closing {
            let has_named_blocks = element
                .children
                .iter()
                .any(|c| matches!(c, Node::Element(e) if e.kind() == ElementKind::NamedBlock));
            if has_named_blocks {
                self.emit_named_block_children(element);
            } else {
                self.emit_default_block(element);
            }
            // Mirror the close tag so its path participates in checking.
            self.buf.line(&format!("{path_text};"));
        }

        self.buf.dedent();
        self.buf.line("}");
    }

    /// The implicit default block holding a component's plain child content.
    fn emit_default_block(&mut self, element: &ElementNode) {
        let names: Vec<&str> = element
            .block_params
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        self.buf.line("{");
        self.buf.indent();
        self.buf.line(&format!(
            "const [{}] = 𝛄.blockParams.default;",
            names.join(", ")
        ));
        self.scope.enter(names);
        self.emit_statements(&element.children);
        self.scope.leave();
        self.buf.dedent();
        self.buf.line("}");
    }

    /// Named-block children, enforcing the exclusivity rule: once any child
    /// is a named block, every sibling must be a named block, a comment, or
    /// insignificant whitespace. Each offender gets its own diagnostic.
    fn emit_named_block_children(&mut self, element: &ElementNode) {
        for (i, child) in element.children.iter().enumerate() {
            match child {
                Node::Comment(comment) => {
                    self.collect_directive(comment, next_significant_span(&element.children, i + 1));
                }
                Node::Element(e) if e.kind() == ElementKind::NamedBlock => {
                    self.emit_named_block(e);
                }
                node if node.is_whitespace() => {}
                node => {
                    self.semantic_error(
                        "Named blocks may not be mixed with other content",
                        node.report_span(),
                    );
                }
            }
        }
    }

    fn emit_named_block(&mut self, block: &ElementNode) {
        let Some(name) = block.named_block_name() else {
            return;
        };
        if !self.check_block_params(&block.block_params, block.span) {
            return;
        }
        let names: Vec<&str> = block.block_params.iter().map(|p| p.name.as_str()).collect();
        self.buf.line("{");
        self.buf.indent();
        self.buf.line(&format!(
            "const [{}] = 𝛄.blockParams{};",
            names.join(", "),
            join_segment(name, false)
        ));
        self.scope.enter(names);
        self.emit_statements(&block.children);
        self.scope.leave();
        self.buf.dedent();
        self.buf.line("}");
    }

    /// Attributes, the forwarding marker, and modifiers, or the bare `𝛄;`
    /// marker statement when the tag carries none of them.
    fn emit_element_parts(&mut self, element: &ElementNode) {
        let mut attrs: IndexMap<String, String> = IndexMap::new();
        let mut applications: Vec<String> = Vec::new();

        for (i, part) in element.parts.iter().enumerate() {
            match part {
                ElementPart::Attribute(attr) => {
                    // Values land one level deeper, inside the braces of the
                    // applyAttributes object literal.
                    self.extra_indent += 1;
                    let value = self.attr_value_text(&attr.value, MustachePosition::Attribute);
                    self.extra_indent -= 1;
                    attrs.insert(attr.name.clone(), value);
                }
                ElementPart::Argument(_) => {}
                ElementPart::Splattributes(_) => {
                    applications.push("χ.applySplattributes(𝚪.element, 𝛄.element);".into());
                }
                ElementPart::Modifier(modifier) => {
                    let call = self.resolve_call_text(&modifier.call);
                    applications.push(format!("χ.applyModifier(𝛄.element, {call});"));
                }
                ElementPart::Comment(comment) => {
                    self.collect_directive(comment, next_part_span(&element.parts, i + 1));
                }
            }
        }
        if attrs.is_empty() && applications.is_empty() {
            self.buf.line("𝛄;");
            return;
        }
        if !attrs.is_empty() {
            self.buf.line("χ.applyAttributes(𝛄.element, {");
            self.buf.indent();
            for (name, value) in &attrs {
                self.buf
                    .line(&format!("{}: {value},", key_text(name)));
            }
            self.buf.dedent();
            self.buf.line("});");
        }
        for application in applications {
            self.buf.line(&application);
        }
    }

    /// The named-arguments object for a component invocation, from its
    /// `@name=value` parts in source order.
    fn component_args_text(&mut self, element: &ElementNode) -> String {
        let mut args: IndexMap<String, String> = IndexMap::new();
        for part in &element.parts {
            if let ElementPart::Argument(attr) = part {
                let value = self.attr_value_text(&attr.value, MustachePosition::Argument);
                args.insert(attr.name.clone(), value);
            }
        }
        if args.is_empty() {
            return "{}".into();
        }
        let pairs: Vec<String> = args
            .iter()
            .map(|(name, value)| format!("{}: {value}", key_text(name)))
            .collect();
        format!("{{ {} }}", pairs.join(", "))
    }

    fn attr_value_text(&mut self, value: &AttrValue, pos: MustachePosition) -> String {
        match value {
            AttrValue::None => json_string(""),
            AttrValue::Text(text) => json_string(&text.value),
            AttrValue::Mustache(mustache) => self.mustache_value(mustache, pos),
            AttrValue::Concat(concat) => self.concat_text(concat),
        }
    }

    /// An interpolated string value: a template literal preserving the
    /// static runs and each interpolation in source order.
    fn concat_text(&mut self, concat: &ConcatValue) -> String {
        let mut out = String::from("`");
        for part in &concat.parts {
            match part {
                ConcatPart::Text(text) => out.push_str(&escape_template_literal(&text.value)),
                ConcatPart::Mustache(mustache) => {
                    let value = self.mustache_value(mustache, MustachePosition::Attribute);
                    out.push_str("${");
                    out.push_str(&value);
                    out.push('}');
                }
            }
        }
        out.push('`');
        out
    }
}

/// The invocation path of a component tag.
fn tag_path(tag: &TagName) -> PathExpression {
    let mut segments = tag.name.split('.');
    let first = segments.next().unwrap_or_default();
    let head = if let Some(arg) = first.strip_prefix('@') {
        PathHead::Argument(arg.to_string())
    } else if first == "this" {
        PathHead::This
    } else {
        PathHead::Ident(first.to_string())
    };
    PathExpression {
        head,
        tail: segments.map(String::from).collect(),
        span: tag.span,
    }
}

/// The span of the next non-comment part in an element tag.
fn next_part_span(parts: &[ElementPart], from: usize) -> Option<Span> {
    parts
        .get(from..)?
        .iter()
        .find(|p| !matches!(p, ElementPart::Comment(_)))
        .map(|p| p.span())
}
