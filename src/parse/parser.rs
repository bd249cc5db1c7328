use thiserror::Error;
use tracing::debug;

use crate::arena::{ Arena, ArenaError };
use crate::lex::token::{ BinaryOpKind, Token, TokenKind };
use crate::ast::expr::{ BinaryExpr, BinaryOp, Expr, Ident, IntLit, Term };
use crate::ast::stmt::{
    AssignStmt, ElifBranch, ExitStmt, IfPred, IfStmt, LetStmt, Program, Scope, Stmt
};

/*
 * *** Parser Rule ***
 *
 * program
 *     : stmt* EOF
 *     ;
 *
 * stmt: EXIT LPAREN expr RPAREN SEMI
 *     | LET ID EQ expr SEMI
 *     | ID EQ expr SEMI
 *     | scope
 *     | IF LPAREN expr RPAREN scope if_pred?
 *     ;
 *
 * scope
 *     : LCURLY stmt* RCURLY
 *     ;
 *
 * if_pred
 *     : ELIF LPAREN expr RPAREN scope if_pred?
 *     | ELSE scope
 *     ;
 *
 * expr: term (bin_op expr)*      -- precedence climbing
 *     ;
 *
 * term: INT
 *     | ID
 *     | LPAREN expr RPAREN
 *     ;
 */

/// Deepest nesting of parentheses, scopes, elif branches and operator
/// chains accepted. Parsing and code generation both recurse once per level.
pub const MAX_NESTING_DEPTH: usize = 256;

/// The first unmet expectation stops the parse; there is no recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} on line {line}")]
    Expected { expected: &'static str, line: usize },

    #[error("nesting deeper than {MAX_NESTING_DEPTH} levels on line {line}")]
    TooDeep { line: usize },

    #[error(transparent)]
    Arena(#[from] ArenaError),
}

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    index: usize,
    depth: usize,
    arena: &'a Arena,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>, arena: &'a Arena) -> Self {
        Self { tokens, index: 0, depth: 0, arena }
    }

    fn peek(&self, offset: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.index + offset)
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.peek(offset).map(|tok| *tok.kind())
    }

    fn consume(&mut self) -> Option<Token<'a>> {
        let tok = self.tokens.get(self.index).copied()?;
        self.index += 1;
        Some(tok)
    }

    fn try_consume(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.peek_kind(0) == Some(kind) {
            self.consume()
        }
        else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        self.try_consume(kind)
            .ok_or_else(|| self.error_expected(kind.describe()))
    }

    // line of the last consumed token
    fn line(&self) -> usize {
        self.index.checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(1, |tok| tok.line())
    }

    fn error_expected(&self, expected: &'static str) -> ParseError {
        ParseError::Expected { expected, line: self.line() }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep { line: self.line() });
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek_kind(0), None | Some(TokenKind::EOF))
    }

    pub fn parse_all(&mut self) -> Result<Program<'a>, ParseError> {
        let mut stmts = Vec::new();
        while !self.at_eof() {
            let Some(stmt) = self.parse_stmt()? else {
                return Err(self.error_expected("statement"));
            };
            stmts.push(stmt);
        }

        debug!(stmts = stmts.len(), arena_used = self.arena.used(), "parsed program");
        Ok(Program::new(stmts))
    }

    pub fn parse_term(&mut self) -> Result<Option<&'a Term<'a>>, ParseError> {
        let term = match self.peek_kind(0) {
            Some(TokenKind::INT) => {
                let tok = self.expect(TokenKind::INT)?;
                Term::IntLit(IntLit::new(tok.lexeme(), tok.line()))
            }

            Some(TokenKind::ID) => {
                let tok = self.expect(TokenKind::ID)?;
                Term::Ident(Ident::new(tok.lexeme(), tok.line()))
            }

            Some(TokenKind::LPAREN) => {
                self.consume();
                self.descend()?;
                let expr = self.require_expr()?;
                self.ascend();
                self.expect(TokenKind::RPAREN)?;
                Term::Paren(expr)
            }

            _ => return Ok(None),
        };

        Ok(Some(self.arena.alloc(term)?))
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        let kind = self.peek_kind(0)?;
        TryInto::<BinaryOpKind>::try_into(kind).ok().map(BinaryOp::from)
    }

    /// Precedence climbing: operators binding at least as tight as
    /// `min_prec` are folded into the left operand, so equal precedence
    /// associates to the left.
    ///
    /// Every fold deepens the left operand by one level and counts toward
    /// [`MAX_NESTING_DEPTH`].
    pub fn parse_expr(&mut self, min_prec: usize) -> Result<Option<Expr<'a>>, ParseError> {
        let Some(term) = self.parse_term()? else {
            return Ok(None);
        };
        let mut lhs = Expr::Term(term);
        let depth = self.depth;

        while let Some(op) = self.peek_binary_op() {
            if op.prec() < min_prec {
                break;
            }

            self.consume();
            self.descend()?;
            let Some(rhs) = self.parse_expr(op.prec() + 1)? else {
                return Err(self.error_expected("expression"));
            };

            lhs = Expr::Binary(self.arena.alloc(BinaryExpr::new(op, lhs, rhs))?);
        }

        self.depth = depth;
        Ok(Some(lhs))
    }

    fn require_expr(&mut self) -> Result<Expr<'a>, ParseError> {
        self.parse_expr(0)?
            .ok_or_else(|| self.error_expected("expression"))
    }

    fn require_scope(&mut self) -> Result<&'a Scope<'a>, ParseError> {
        self.parse_scope()?
            .ok_or_else(|| self.error_expected("scope"))
    }

    // `( expr )` as used by `exit`, `if` and `elif`
    fn parse_paren_expr(&mut self) -> Result<Expr<'a>, ParseError> {
        self.expect(TokenKind::LPAREN)?;
        let expr = self.require_expr()?;
        self.expect(TokenKind::RPAREN)?;
        Ok(expr)
    }

    pub fn parse_scope(&mut self) -> Result<Option<&'a Scope<'a>>, ParseError> {
        if self.try_consume(TokenKind::LCURLY).is_none() {
            return Ok(None);
        }

        self.descend()?;
        let mut stmts = Vec::new();
        while let Some(stmt) = self.parse_stmt()? {
            stmts.push(stmt);
        }
        self.ascend();
        self.expect(TokenKind::RCURLY)?;

        let stmts = self.arena.alloc_slice(&stmts)?;
        Ok(Some(self.arena.alloc(Scope::new(stmts))?))
    }

    pub fn parse_if_pred(&mut self) -> Result<Option<&'a IfPred<'a>>, ParseError> {
        let pred = match self.peek_kind(0) {
            Some(TokenKind::ELIF) => {
                self.consume();
                let cond = self.parse_paren_expr()?;
                let scope = self.require_scope()?;
                self.descend()?;
                let next = self.parse_if_pred()?;
                self.ascend();

                IfPred::Elif(self.arena.alloc(ElifBranch::new(cond, scope, next))?)
            }

            Some(TokenKind::ELSE) => {
                self.consume();
                IfPred::Else(self.require_scope()?)
            }

            _ => return Ok(None),
        };

        Ok(Some(self.arena.alloc(pred)?))
    }

    /// Returns `Ok(None)` when the next token cannot start a statement, the
    /// caller decides whether that is an error.
    pub fn parse_stmt(&mut self) -> Result<Option<Stmt<'a>>, ParseError> {
        let stmt = match self.peek_kind(0) {
            Some(TokenKind::EXIT) => {
                self.consume();
                let status = self.parse_paren_expr()?;
                self.expect(TokenKind::SEMI)?;

                Stmt::Exit(self.arena.alloc(ExitStmt::new(status))?)
            }

            Some(TokenKind::LET) => {
                self.consume();
                let tok = self.expect(TokenKind::ID)?;
                self.expect(TokenKind::EQ)?;
                let initializer = self.require_expr()?;
                self.expect(TokenKind::SEMI)?;

                let ident = Ident::new(tok.lexeme(), tok.line());
                Stmt::Let(self.arena.alloc(LetStmt::new(ident, initializer))?)
            }

            Some(TokenKind::ID) if self.peek_kind(1) == Some(TokenKind::EQ) => {
                let tok = self.expect(TokenKind::ID)?;
                self.consume();
                let value = self.require_expr()?;
                self.expect(TokenKind::SEMI)?;

                let ident = Ident::new(tok.lexeme(), tok.line());
                Stmt::Assign(self.arena.alloc(AssignStmt::new(ident, value))?)
            }

            Some(TokenKind::LCURLY) => Stmt::Scope(self.require_scope()?),

            Some(TokenKind::IF) => {
                self.consume();
                let cond = self.parse_paren_expr()?;
                let then = self.require_scope()?;
                let pred = self.parse_if_pred()?;

                Stmt::If(self.arena.alloc(IfStmt::new(cond, then, pred))?)
            }

            _ => return Ok(None),
        };

        Ok(Some(stmt))
    }
}
