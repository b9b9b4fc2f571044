//! Mustache and block statement parsing.

use crate::ast::{BlockParam, BlockStatement, Call, Expression, MustacheStatement, Node, PathExpression};
use crate::span::Span;

use super::{Parser, SyntaxError};

/// One `{{else ...}}` clause and what follows it, before the outer close
/// tag's position is known.
enum ElseChain {
    /// A final `{{else}}` with plain content.
    Plain(Vec<Node>),
    /// `{{else path ...}}`: a chained invocation sharing the outer close tag.
    Chained {
        start: usize,
        call: Call,
        path: PathExpression,
        block_params: Vec<BlockParam>,
        program: Vec<Node>,
        next: Option<Box<ElseChain>>,
    },
}

impl Parser<'_> {
    pub(super) fn parse_mustache(&mut self) -> Result<MustacheStatement, SyntaxError> {
        let start = self.pos;
        self.bump(2); // {{
        self.skip_ws();
        let call = self.parse_call()?;
        self.skip_ws();
        if !self.eat("}}") {
            return Err(self.error_here("expected `}}`"));
        }
        Ok(MustacheStatement {
            call,
            span: Span::new(start, self.pos),
        })
    }

    pub(super) fn parse_block(&mut self) -> Result<BlockStatement, SyntaxError> {
        let start = self.pos;
        self.bump(3); // {{#
        self.skip_ws();
        let call = self.parse_call()?;
        let path = self.require_path(&call.callee, "expected a path after `{{#`")?;
        let open_name = path.span.slice(self.source).to_string();
        self.skip_ws();
        let block_params = if self.at_block_params_clause() {
            self.parse_block_params()?
        } else {
            Vec::new()
        };
        self.skip_ws();
        if !self.eat("}}") {
            return Err(self.error_here("expected `}}`"));
        }

        let program = self.parse_nodes()?;
        let chain = if self.at_else_tag() {
            Some(self.parse_else_chain()?)
        } else {
            None
        };

        self.expect_block_close(&open_name, start)?;
        let span = Span::new(start, self.pos);
        Ok(BlockStatement {
            call,
            path,
            block_params,
            program,
            inverse: chain.map(|c| materialize_else(c, span.end)),
            span,
        })
    }

    fn require_path(
        &self,
        expr: &Expression,
        message: &str,
    ) -> Result<PathExpression, SyntaxError> {
        match expr {
            Expression::Path(p) => Ok(p.clone()),
            other => Err(self.error(message, other.span())),
        }
    }

    fn expect_block_close(&mut self, open_name: &str, open_start: usize) -> Result<(), SyntaxError> {
        if !self.at("{{/") {
            return Err(self.error(
                format!("unclosed block `{{{{#{open_name}}}}}`"),
                Span::new(open_start, self.pos),
            ));
        }
        let close_start = self.pos;
        self.bump(3);
        self.skip_ws();
        let name = self
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '$' | '-' | '@'))
            .to_string();
        self.skip_ws();
        if !self.eat("}}") {
            return Err(self.error_here("expected `}}`"));
        }
        if name != open_name {
            return Err(self.error(
                format!("closing tag `{{{{/{name}}}}}` does not match `{{{{#{open_name}}}}}`"),
                Span::new(close_start, self.pos),
            ));
        }
        Ok(())
    }

    fn parse_else_chain(&mut self) -> Result<ElseChain, SyntaxError> {
        let start = self.pos;
        self.bump("{{else".len());
        self.skip_ws();
        if self.eat("}}") {
            let nodes = self.parse_nodes()?;
            if self.at_else_tag() {
                return Err(
                    self.error("unexpected {{else}} after a final {{else}} clause", self.tag_span_here())
                );
            }
            return Ok(ElseChain::Plain(nodes));
        }

        let call = self.parse_call()?;
        let path = self.require_path(&call.callee, "expected a path after `{{else`")?;
        self.skip_ws();
        let block_params = if self.at_block_params_clause() {
            self.parse_block_params()?
        } else {
            Vec::new()
        };
        self.skip_ws();
        if !self.eat("}}") {
            return Err(self.error_here("expected `}}`"));
        }
        let program = self.parse_nodes()?;
        let next = if self.at_else_tag() {
            Some(Box::new(self.parse_else_chain()?))
        } else {
            None
        };
        Ok(ElseChain::Chained {
            start,
            call,
            path,
            block_params,
            program,
            next,
        })
    }
}

/// Resolves an else chain into inverse content once the shared close tag's
/// end offset is known.
fn materialize_else(chain: ElseChain, end: usize) -> Vec<Node> {
    match chain {
        ElseChain::Plain(nodes) => nodes,
        ElseChain::Chained {
            start,
            call,
            path,
            block_params,
            program,
            next,
        } => vec![Node::Block(BlockStatement {
            call,
            path,
            block_params,
            program,
            inverse: next.map(|n| materialize_else(*n, end)),
            span: Span::new(start, end),
        })],
    }
}
