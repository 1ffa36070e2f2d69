use super::lexer::{Token, TokenKind};
use super::Grammar;
use crate::errors::ExpressionError;
use crate::number::Number;

/// Nesting limit for parentheses, unary chains and call arguments
pub const MAX_DEPTH: usize = 64;

/// Token limit per expression. Operator chains build one tree level per
/// operator, so this also bounds the depth of `a + b + c ...`.
pub const MAX_TOKENS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Number),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Recursive-descent parser over a token slice.
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/' | '%') unary)*
/// unary   := ('+' | '-') unary | power
/// power   := primary ('^' unary)?
/// primary := NUMBER | '(' expr ')' | IDENT '(' expr (',' expr)* ')'
/// ```
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    grammar: Grammar,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], grammar: Grammar) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            grammar,
        }
    }

    pub fn parse(mut self) -> Result<Expr, ExpressionError> {
        if self.tokens.is_empty() {
            return Err(ExpressionError::Empty);
        }
        if self.tokens.len() > MAX_TOKENS {
            return Err(ExpressionError::TooLong {
                tokens: self.tokens.len(),
                max: MAX_TOKENS,
            });
        }
        let expr = self.expr()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(ExpressionError::UnexpectedToken {
                found: token.kind.describe(),
                pos: token.pos,
            }),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn require_extended(&self, token: &Token) -> Result<(), ExpressionError> {
        if self.grammar == Grammar::Strict {
            let op = match token.kind {
                TokenKind::Caret => "^",
                TokenKind::Percent => "%",
                _ => ",",
            };
            return Err(ExpressionError::OperatorNotAllowed {
                op: op.to_string(),
                pos: token.pos,
            });
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.term()?;
        while let Some(token) = self.peek() {
            let op = match token.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.unary()?;
        while let Some(token) = self.peek() {
            let op = match token.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => {
                    self.require_extended(token)?;
                    BinaryOp::Rem
                }
                _ => break,
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Plus) => UnaryOp::Pos,
            _ => return self.power(),
        };
        self.advance();
        self.enter()?;
        let operand = self.unary()?;
        self.leave();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.primary()?;
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Caret {
                self.require_extended(token)?;
                self.advance();
                self.enter()?;
                let exponent = self.unary()?;
                self.leave();
                return Ok(Expr::Binary {
                    op: BinaryOp::Pow,
                    lhs: Box::new(base),
                    rhs: Box::new(exponent),
                });
            }
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, ExpressionError> {
        let token = self.advance().ok_or(ExpressionError::UnexpectedEnd)?;
        match &token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(*n)),
            TokenKind::LParen => {
                self.enter()?;
                let inner = self.expr()?;
                self.leave();
                self.expect_close(token.pos)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                let is_call = self.peek().is_some_and(|t| t.kind == TokenKind::LParen);
                if self.grammar == Grammar::Strict || !is_call {
                    return Err(ExpressionError::IdentifierNotAllowed {
                        name: name.clone(),
                        pos: token.pos,
                    });
                }
                let open = self.advance().map(|t| t.pos).unwrap_or(token.pos);
                self.enter()?;
                let args = self.arguments(open)?;
                self.leave();
                Ok(Expr::Call {
                    name: name.clone(),
                    args,
                })
            }
            other => Err(ExpressionError::UnexpectedToken {
                found: other.describe(),
                pos: token.pos,
            }),
        }
    }

    fn arguments(&mut self, open: usize) -> Result<Vec<Expr>, ExpressionError> {
        let mut args = Vec::new();
        if self.peek().is_some_and(|t| t.kind == TokenKind::RParen) {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.peek() {
                Some(t) if t.kind == TokenKind::Comma => {
                    self.advance();
                }
                _ => break,
            }
        }
        self.expect_close(open)?;
        Ok(args)
    }

    fn expect_close(&mut self, open: usize) -> Result<(), ExpressionError> {
        match self.advance() {
            Some(t) if t.kind == TokenKind::RParen => Ok(()),
            Some(t) if t.kind == TokenKind::Comma => {
                self.require_extended(t)?;
                Err(ExpressionError::UnexpectedToken {
                    found: t.kind.describe(),
                    pos: t.pos,
                })
            }
            Some(t) => Err(ExpressionError::UnexpectedToken {
                found: t.kind.describe(),
                pos: t.pos,
            }),
            None => Err(ExpressionError::UnclosedParen { pos: open }),
        }
    }
}
