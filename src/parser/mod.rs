//! Parser for the template language.
//!
//! A hand-rolled scanner plus recursive descent over the raw source text.
//! Byte positions are tracked throughout so every AST node carries its exact
//! source span. Parsing is all-or-nothing: any syntax failure aborts the
//! parse and no partial tree reaches later stages.

mod element;
mod errors;
mod expr;
mod mustache;

pub use errors::SyntaxError;

use tracing::trace;

use crate::ast::{CommentNode, Node, TextNode};
use crate::span::Span;

/// The template parser. Consumed by [`Parser::parse`].
pub struct Parser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Parses the whole template into a list of top-level nodes.
    pub fn parse(mut self) -> Result<Vec<Node>, SyntaxError> {
        trace!(bytes = self.source.len(), "parsing template");
        let nodes = self.parse_nodes()?;
        if !self.at_eof() {
            return Err(self.unexpected_terminator());
        }
        Ok(nodes)
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn at(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Advances by `n` bytes. Callers only pass lengths of just-matched
    /// ASCII patterns or `char::len_utf8` values, so boundaries hold.
    fn bump(&mut self, n: usize) {
        self.pos += n;
    }

    /// Consumes `pat` if the cursor is on it.
    fn eat(&mut self, pat: &str) -> bool {
        if self.at(pat) {
            self.bump(pat.len());
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump(c.len_utf8());
        }
    }

    /// Consumes characters matching `pred`, returning the matched slice.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump(c.len_utf8());
        }
        &self.source[start..self.pos]
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    fn error(&self, message: impl Into<String>, span: Span) -> SyntaxError {
        SyntaxError::new(self.source, message, span)
    }

    /// An error spanning the character under the cursor.
    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        let span = match self.peek() {
            Some(c) => Span::new(self.pos, self.pos + c.len_utf8()),
            None => Span::empty(self.pos),
        };
        self.error(message, span)
    }

    /// The span from the cursor through the next `}}`, inclusive.
    fn tag_span_here(&self) -> Span {
        let end = self
            .rest()
            .find("}}")
            .map(|i| self.pos + i + 2)
            .unwrap_or(self.source.len());
        Span::new(self.pos, end)
    }

    fn unexpected_terminator(&self) -> SyntaxError {
        if self.at("{{/") {
            self.error("unexpected closing block", self.tag_span_here())
        } else if self.at_else_tag() {
            self.error("unexpected {{else}}", self.tag_span_here())
        } else {
            let end = self
                .rest()
                .find('>')
                .map(|i| self.pos + i + 1)
                .unwrap_or(self.source.len());
            self.error("unexpected closing tag", Span::new(self.pos, end))
        }
    }

    // ------------------------------------------------------------------
    // Lookahead
    // ------------------------------------------------------------------

    fn at_element_start(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<')
            && matches!(chars.next(), Some(c) if is_tag_start(c))
    }

    /// Whether the cursor is on `{{else` as a clause tag.
    fn at_else_tag(&self) -> bool {
        match self.rest().strip_prefix("{{else") {
            Some(after) => matches!(after.chars().next(), Some(c) if c.is_whitespace() || c == '}'),
            None => false,
        }
    }

    fn at_markup_start(&self) -> bool {
        self.at("{{") || self.at("<!--") || self.at("</") || self.at_element_start()
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Parses nodes until EOF or a terminator (`{{/`, `{{else`, `</`) the
    /// caller is responsible for.
    fn parse_nodes(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut nodes = Vec::new();
        while !self.at_eof() {
            if self.at("{{/") || self.at("</") || self.at_else_tag() {
                break;
            }
            nodes.push(self.parse_node()?);
        }
        Ok(nodes)
    }

    fn parse_node(&mut self) -> Result<Node, SyntaxError> {
        if self.at("{{!") {
            return Ok(Node::Comment(self.parse_comment_mustache()?));
        }
        if self.at("{{#") {
            return Ok(Node::Block(self.parse_block()?));
        }
        if self.at("{{") {
            return Ok(Node::Mustache(self.parse_mustache()?));
        }
        if self.at("<!--") {
            return Ok(Node::Comment(self.parse_comment_html()?));
        }
        if self.at_element_start() {
            return Ok(Node::Element(self.parse_element()?));
        }
        Ok(Node::Text(self.parse_text()))
    }

    fn parse_text(&mut self) -> TextNode {
        let start = self.pos;
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if self.at_markup_start() {
                break;
            }
            value.push(c);
            self.bump(c.len_utf8());
        }
        TextNode {
            value,
            span: Span::new(start, self.pos),
        }
    }

    fn parse_comment_mustache(&mut self) -> Result<CommentNode, SyntaxError> {
        let start = self.pos;
        let (open, close) = if self.at("{{!--") {
            ("{{!--", "--}}")
        } else {
            ("{{!", "}}")
        };
        self.bump(open.len());
        let inner_start = self.pos;
        let Some(i) = self.rest().find(close) else {
            return Err(self.error("unclosed comment", Span::new(start, self.source.len())));
        };
        let value = self.source[inner_start..inner_start + i].to_string();
        self.bump(i + close.len());
        Ok(CommentNode {
            value,
            span: Span::new(start, self.pos),
        })
    }

    fn parse_comment_html(&mut self) -> Result<CommentNode, SyntaxError> {
        let start = self.pos;
        self.bump(4); // <!--
        let inner_start = self.pos;
        let Some(i) = self.rest().find("-->") else {
            return Err(self.error("unclosed comment", Span::new(start, self.source.len())));
        };
        let value = self.source[inner_start..inner_start + i].to_string();
        self.bump(i + 3);
        Ok(CommentNode {
            value,
            span: Span::new(start, self.pos),
        })
    }
}

fn is_tag_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '@' | ':' | '_' | '$')
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ':' | '@' | '$')
}
