//! Expression, parameter, and block-param parsing.

use crate::ast::{
    BlockParam, Call, Expression, HashPair, Literal, LiteralValue, PathExpression, PathHead,
    SubExpression,
};
use crate::span::Span;

use super::{Parser, SyntaxError};

impl Parser<'_> {
    /// Parses a callee followed by positional params and hash pairs.
    ///
    /// Stops at `}}`, `)`, `|`, or an `as |...|` clause; the caller consumes
    /// whichever terminator it expects.
    pub(super) fn parse_call(&mut self) -> Result<Call, SyntaxError> {
        let callee = self.parse_expression()?;
        let mut params = Vec::new();
        let mut hash: Vec<HashPair> = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None | Some('}') | Some(')') | Some('|') => break,
                _ => {}
            }
            if self.at_block_params_clause() {
                break;
            }
            if let Some(key_len) = self.peek_hash_key() {
                let key_start = self.pos;
                let key = self.rest()[..key_len].to_string();
                self.bump(key_len + 1); // key and `=`
                let value = self.parse_expression()?;
                let span = Span::new(key_start, value.span().end);
                hash.push(HashPair { key, value, span });
            } else {
                let value = self.parse_expression()?;
                if !hash.is_empty() {
                    return Err(self.error(
                        "positional parameters must precede named parameters",
                        value.span(),
                    ));
                }
                params.push(value);
            }
        }
        Ok(Call {
            callee,
            params,
            hash,
        })
    }

    pub(super) fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Err(self.error("expected an expression", Span::empty(start)));
        };
        match c {
            '(' => {
                self.bump(1);
                self.skip_ws();
                let call = self.parse_call()?;
                self.skip_ws();
                if !self.eat(")") {
                    return Err(self.error_here("expected `)` to close subexpression"));
                }
                Ok(Expression::SubExpression(Box::new(SubExpression {
                    call,
                    span: Span::new(start, self.pos),
                })))
            }
            '"' | '\'' => self.parse_string_literal(),
            '0'..='9' => self.parse_number_literal(),
            '-' if self.rest().as_bytes().get(1).is_some_and(u8::is_ascii_digit) => {
                self.parse_number_literal()
            }
            '@' => {
                self.bump(1);
                let name = self.take_segment();
                if name.is_empty() {
                    return Err(self.error_here("expected an identifier after `@`"));
                }
                let tail = self.parse_path_tail()?;
                Ok(Expression::Path(PathExpression {
                    head: PathHead::Argument(name),
                    tail,
                    span: Span::new(start, self.pos),
                }))
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let word = self.take_segment();
                if self.peek() != Some('.') {
                    let literal = match word.as_str() {
                        "true" => Some(LiteralValue::Boolean(true)),
                        "false" => Some(LiteralValue::Boolean(false)),
                        "null" => Some(LiteralValue::Null),
                        "undefined" => Some(LiteralValue::Undefined),
                        _ => None,
                    };
                    if let Some(value) = literal {
                        return Ok(Expression::Literal(Literal {
                            value,
                            span: Span::new(start, self.pos),
                        }));
                    }
                }
                let head = if word == "this" {
                    PathHead::This
                } else {
                    PathHead::Ident(word)
                };
                let tail = self.parse_path_tail()?;
                Ok(Expression::Path(PathExpression {
                    head,
                    tail,
                    span: Span::new(start, self.pos),
                }))
            }
            other => Err(self.error(
                format!("expected an expression, found `{other}`"),
                Span::new(start, start + other.len_utf8()),
            )),
        }
    }

    /// A path segment: identifier characters including `-` and `$`.
    fn take_segment(&mut self) -> String {
        self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-'))
            .to_string()
    }

    fn parse_path_tail(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut tail = Vec::new();
        while self.peek() == Some('.') {
            self.bump(1);
            let segment = self.take_segment();
            if segment.is_empty() {
                return Err(self.error_here("expected a path segment after `.`"));
            }
            tail.push(segment);
        }
        Ok(tail)
    }

    fn parse_string_literal(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.pos;
        let quote = self.peek().expect("caller checked the quote");
        self.bump(1);
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(self.error(
                        "unterminated string literal",
                        Span::new(start, self.source.len()),
                    ));
                }
                Some('\\') => {
                    self.bump(1);
                    let Some(escaped) = self.peek() else {
                        return Err(self.error(
                            "unterminated string literal",
                            Span::new(start, self.source.len()),
                        ));
                    };
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                    self.bump(escaped.len_utf8());
                }
                Some(c) if c == quote => {
                    self.bump(1);
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.bump(c.len_utf8());
                }
            }
        }
        Ok(Expression::Literal(Literal {
            value: LiteralValue::String(value),
            span: Span::new(start, self.pos),
        }))
    }

    fn parse_number_literal(&mut self) -> Result<Expression, SyntaxError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump(1);
        }
        self.take_while(|c| c.is_ascii_digit());
        if self.at(".") && self.rest().as_bytes().get(1).is_some_and(u8::is_ascii_digit) {
            self.bump(1);
            self.take_while(|c| c.is_ascii_digit());
        }
        Ok(Expression::Literal(Literal {
            value: LiteralValue::Number(self.source[start..self.pos].to_string()),
            span: Span::new(start, self.pos),
        }))
    }

    /// Byte length of a `key=` lookahead, if the cursor is on a hash pair.
    fn peek_hash_key(&self) -> Option<usize> {
        let bytes = self.rest().as_bytes();
        let first = *bytes.first()?;
        if !(first.is_ascii_alphabetic() || first == b'_' || first == b'$') {
            return None;
        }
        let mut len = 1;
        while let Some(&b) = bytes.get(len) {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'-') {
                len += 1;
            } else {
                break;
            }
        }
        if bytes.get(len) == Some(&b'=') && bytes.get(len + 1) != Some(&b'=') {
            Some(len)
        } else {
            None
        }
    }

    /// Whether the cursor is on an `as |...|` block-params clause.
    pub(super) fn at_block_params_clause(&self) -> bool {
        let Some(after) = self.rest().strip_prefix("as") else {
            return false;
        };
        match after.chars().next() {
            Some(c) if c.is_whitespace() => after.trim_start().starts_with('|'),
            _ => false,
        }
    }

    pub(super) fn parse_block_params(&mut self) -> Result<Vec<BlockParam>, SyntaxError> {
        let start = self.pos;
        self.bump(2); // as
        self.skip_ws();
        if !self.eat("|") {
            return Err(self.error_here("expected `|` to open block params"));
        }
        let mut params = Vec::new();
        loop {
            self.skip_ws();
            if self.eat("|") {
                break;
            }
            if self.at_eof() {
                return Err(self.error("unclosed block params", Span::new(start, self.pos)));
            }
            let name_start = self.pos;
            let name = self
                .take_while(|c| !c.is_whitespace() && !matches!(c, '|' | '}' | '>'))
                .to_string();
            if name.is_empty() {
                return Err(self.error_here("expected a block parameter name"));
            }
            params.push(BlockParam {
                name,
                span: Span::new(name_start, self.pos),
            });
        }
        Ok(params)
    }
}
