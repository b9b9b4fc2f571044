//! Element, component, and named-block tag parsing.

use crate::ast::{
    AttrValue, Attribute, ConcatPart, ConcatValue, ElementNode, ElementPart, TagName, TextNode,
};
use crate::span::Span;

use super::{Parser, SyntaxError, is_tag_char};

/// Elements that take no children and need no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

impl Parser<'_> {
    pub(super) fn parse_element(&mut self) -> Result<ElementNode, SyntaxError> {
        let start = self.pos;
        self.bump(1); // <
        let tag_start = self.pos;
        let name = self.take_while(is_tag_char).to_string();
        let tag = TagName {
            name,
            span: Span::new(tag_start, self.pos),
        };

        let mut parts = Vec::new();
        let mut block_params = Vec::new();
        let mut self_closing = false;
        loop {
            self.skip_ws();
            if self.at_eof() {
                return Err(self.error(
                    format!("unclosed tag `<{}>`", tag.name),
                    Span::new(start, self.pos),
                ));
            }
            if self.eat("/>") {
                self_closing = true;
                break;
            }
            if self.eat(">") {
                break;
            }
            if self.at("{{!") {
                parts.push(ElementPart::Comment(self.parse_comment_mustache()?));
                continue;
            }
            if self.at("{{") {
                parts.push(ElementPart::Modifier(self.parse_mustache()?));
                continue;
            }
            if self.at("...") {
                let marker_start = self.pos;
                if !self.eat("...attributes") {
                    return Err(self.error_here("expected `...attributes`"));
                }
                parts.push(ElementPart::Splattributes(Span::new(marker_start, self.pos)));
                continue;
            }
            if self.at_block_params_clause() {
                block_params = self.parse_block_params()?;
                continue;
            }
            parts.push(self.parse_attribute()?);
        }

        let mut children = Vec::new();
        let mut end = self.pos;
        if !self_closing && !VOID_ELEMENTS.contains(&tag.name.as_str()) {
            children = self.parse_nodes()?;
            if !self.at("</") {
                return Err(self.error(
                    format!("unclosed element `<{}>`", tag.name),
                    Span::new(start, tag.span.end),
                ));
            }
            let close_start = self.pos;
            self.bump(2);
            self.skip_ws();
            let close_name = self.take_while(is_tag_char).to_string();
            self.skip_ws();
            if !self.eat(">") {
                return Err(self.error_here("expected `>`"));
            }
            if close_name != tag.name {
                return Err(self.error(
                    format!("closing tag `</{close_name}>` does not match `<{}>`", tag.name),
                    Span::new(close_start, self.pos),
                ));
            }
            end = self.pos;
        }

        Ok(ElementNode {
            tag,
            parts,
            block_params,
            children,
            self_closing,
            span: Span::new(start, end),
        })
    }

    fn parse_attribute(&mut self) -> Result<ElementPart, SyntaxError> {
        let start = self.pos;
        let name = self
            .take_while(|c| {
                !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<' | '`')
            })
            .to_string();
        if name.is_empty() {
            let found = self.peek().unwrap_or(' ');
            return Err(self.error_here(format!("unexpected `{found}` in tag")));
        }
        let value = if self.eat("=") {
            self.parse_attr_value()?
        } else {
            AttrValue::None
        };
        let span = Span::new(start, self.pos);
        Ok(match name.strip_prefix('@') {
            Some(arg_name) => ElementPart::Argument(Attribute {
                name: arg_name.to_string(),
                value,
                span,
            }),
            None => ElementPart::Attribute(Attribute { name, value, span }),
        })
    }

    fn parse_attr_value(&mut self) -> Result<AttrValue, SyntaxError> {
        match self.peek() {
            Some('"') | Some('\'') => self.parse_quoted_attr_value(),
            Some('{') if self.at("{{") => Ok(AttrValue::Mustache(self.parse_mustache()?)),
            Some(c) if !c.is_whitespace() && c != '>' => {
                let start = self.pos;
                let value = self
                    .take_while(|c| {
                        !c.is_whitespace() && !matches!(c, '>' | '/' | '"' | '\'' | '=' | '`')
                    })
                    .to_string();
                Ok(AttrValue::Text(TextNode {
                    value,
                    span: Span::new(start, self.pos),
                }))
            }
            _ => Err(self.error_here("expected an attribute value")),
        }
    }

    /// A quoted value; becomes a concat when it contains interpolations.
    fn parse_quoted_attr_value(&mut self) -> Result<AttrValue, SyntaxError> {
        let start = self.pos;
        let quote = self.peek().expect("caller checked the quote");
        self.bump(1);
        let mut parts: Vec<ConcatPart> = Vec::new();
        let mut text = String::new();
        let mut text_start = self.pos;
        loop {
            if self.at_eof() {
                return Err(self.error(
                    "unterminated attribute value",
                    Span::new(start, self.source.len()),
                ));
            }
            if self.at("{{") {
                if !text.is_empty() {
                    parts.push(ConcatPart::Text(TextNode {
                        value: std::mem::take(&mut text),
                        span: Span::new(text_start, self.pos),
                    }));
                }
                parts.push(ConcatPart::Mustache(self.parse_mustache()?));
                text_start = self.pos;
                continue;
            }
            let c = self.peek().expect("not at EOF");
            if c == quote {
                if !text.is_empty() {
                    parts.push(ConcatPart::Text(TextNode {
                        value: std::mem::take(&mut text),
                        span: Span::new(text_start, self.pos),
                    }));
                }
                self.bump(1);
                break;
            }
            text.push(c);
            self.bump(c.len_utf8());
        }

        let span = Span::new(start, self.pos);
        let has_interpolation = parts
            .iter()
            .any(|p| matches!(p, ConcatPart::Mustache(_)));
        if has_interpolation {
            Ok(AttrValue::Concat(ConcatValue { parts, span }))
        } else {
            let value = parts
                .into_iter()
                .find_map(|p| match p {
                    ConcatPart::Text(t) => Some(t.value),
                    ConcatPart::Mustache(_) => None,
                })
                .unwrap_or_default();
            Ok(AttrValue::Text(TextNode { value, span }))
        }
    }
}
