//! The template AST.
//!
//! The parser produces this tree and the emitter consumes it in one pass.
//! Every node carries its exact start/end byte offsets in the source; the
//! emitter and the directive collector both depend on those spans being
//! faithful to the input text.

use crate::span::Span;

/// A node in a template's content.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A run of plain text.
    Text(TextNode),
    /// A mustache or HTML comment.
    Comment(CommentNode),
    /// An inline mustache, `{{expr p1 k=v}}`.
    Mustache(MustacheStatement),
    /// A block invocation, `{{#path ...}}...{{/path}}`.
    Block(BlockStatement),
    /// An element, component invocation, or named-block tag.
    Element(ElementNode),
}

impl Node {
    /// The node's span in the source.
    pub fn span(&self) -> Span {
        match self {
            Node::Text(t) => t.span,
            Node::Comment(c) => c.span,
            Node::Mustache(m) => m.span,
            Node::Block(b) => b.span,
            Node::Element(e) => e.span,
        }
    }

    /// The span used when reporting this node, with text trimmed of
    /// surrounding whitespace.
    pub fn report_span(&self) -> Span {
        match self {
            Node::Text(t) => t.trimmed_span(),
            other => other.span(),
        }
    }

    /// Whether the node is whitespace-only text.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(t) if t.value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub value: String,
    pub span: Span,
}

impl TextNode {
    /// The span of the text with leading/trailing whitespace removed.
    pub fn trimmed_span(&self) -> Span {
        let leading = self.value.len() - self.value.trim_start().len();
        let trailing = self.value.len() - self.value.trim_end().len();
        if leading + trailing >= self.value.len() {
            return Span::empty(self.span.start);
        }
        Span::new(self.span.start + leading, self.span.end - trailing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    /// The text between the comment delimiters.
    pub value: String,
    pub span: Span,
}

/// A callee plus its positional and named arguments.
///
/// Shared by mustaches, block invocations, subexpressions, and modifiers.
/// Positional parameters always precede named ones in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Expression,
    pub params: Vec<Expression>,
    pub hash: Vec<HashPair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: String,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MustacheStatement {
    pub call: Call,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub call: Call,
    /// The invocation path; always the same expression as `call.callee`.
    pub path: PathExpression,
    pub block_params: Vec<BlockParam>,
    pub program: Vec<Node>,
    /// Content of the `{{else}}` clause. A chained `{{else if ...}}` or
    /// `{{else somePath ...}}` clause appears here as a single nested
    /// `Node::Block` spanning to the outer close tag.
    pub inverse: Option<Vec<Node>>,
    pub span: Span,
}

/// A name introduced by an `as |...|` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockParam {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: TagName,
    /// Everything between the tag name and `>`, in source order.
    pub parts: Vec<ElementPart>,
    pub block_params: Vec<BlockParam>,
    pub children: Vec<Node>,
    pub self_closing: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagName {
    pub name: String,
    pub span: Span,
}

/// How an element tag invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A plain HTML element.
    Plain,
    /// A component invocation resolved through a path.
    Component,
    /// A named content slot, `<:name>`.
    NamedBlock,
}

impl ElementNode {
    pub fn kind(&self) -> ElementKind {
        let name = self.tag.name.as_str();
        if name.starts_with(':') {
            ElementKind::NamedBlock
        } else if name.contains('.')
            || name.starts_with('@')
            || name == "this"
            || name.starts_with(|c: char| c.is_ascii_uppercase())
        {
            ElementKind::Component
        } else {
            ElementKind::Plain
        }
    }

    /// The slot name of a named-block tag, without the leading `:`.
    pub fn named_block_name(&self) -> Option<&str> {
        self.tag.name.strip_prefix(':')
    }
}

/// One item inside an element's open tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementPart {
    /// A plain attribute.
    Attribute(Attribute),
    /// An argument, `@name=value`. The stored name omits the `@`.
    Argument(Attribute),
    /// The forwarding-attributes marker, `...attributes`.
    Splattributes(Span),
    /// An attached behavior modifier, `{{path ...}}`.
    Modifier(MustacheStatement),
    /// A comment inside the tag.
    Comment(CommentNode),
}

impl ElementPart {
    pub fn span(&self) -> Span {
        match self {
            ElementPart::Attribute(a) | ElementPart::Argument(a) => a.span,
            ElementPart::Splattributes(span) => *span,
            ElementPart::Modifier(m) => m.span,
            ElementPart::Comment(c) => c.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// A bare attribute with no `=`.
    None,
    /// A static text value.
    Text(TextNode),
    /// An unquoted mustache value, `name={{expr}}`.
    Mustache(MustacheStatement),
    /// A quoted value containing at least one interpolation.
    Concat(ConcatValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConcatValue {
    pub parts: Vec<ConcatPart>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConcatPart {
    Text(TextNode),
    Mustache(MustacheStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Path(PathExpression),
    SubExpression(Box<SubExpression>),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(l) => l.span,
            Expression::Path(p) => p.span,
            Expression::SubExpression(s) => s.span,
        }
    }
}

/// A nested invocation inside an expression position, `(path p1 k=v)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    pub call: Call,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Boolean(bool),
    Null,
    Undefined,
    /// Numeric literal text, emitted verbatim.
    Number(String),
    /// Unescaped string contents.
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    pub head: PathHead,
    /// Dot-separated segments after the head.
    pub tail: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathHead {
    /// The implicit receiver, `this`.
    This,
    /// A named argument, `@name`.
    Argument(String),
    /// A free identifier, resolved through the scope stack.
    Ident(String),
}

impl PathExpression {
    /// The head's identifier when the path is a bare keyword-capable name,
    /// i.e. an identifier head with no tail segments.
    pub fn bare_ident(&self) -> Option<&str> {
        match (&self.head, self.tail.is_empty()) {
            (PathHead::Ident(name), true) => Some(name),
            _ => None,
        }
    }
}
