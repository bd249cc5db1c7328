use crate::lex::token::BinaryOpKind;

// every reference below points into the same `Arena`
#[derive(Clone, Copy, Debug)]
pub enum Expr<'a> {
    Term(&'a Term<'a>),
    Binary(&'a BinaryExpr<'a>),
}

#[derive(Clone, Copy, Debug)]
pub enum Term<'a> {
    IntLit(IntLit<'a>),
    Ident(Ident<'a>),
    Paren(Expr<'a>),
}

/// Integer literal kept as source text; its width is whatever the target
/// instruction accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntLit<'a> {
    value: &'a str,
    line: usize,
}

impl<'a> IntLit<'a> {
    pub fn new(value: &'a str, line: usize) -> Self {
        IntLit { value, line }
    }

    pub fn value(&self) -> &'a str {
        self.value
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ident<'a> {
    name: &'a str,
    line: usize,
}

impl<'a> Ident<'a> {
    pub fn new(name: &'a str, line: usize) -> Self {
        Ident { name, line }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn prec(&self) -> usize {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 0,
            BinaryOp::Mul | BinaryOp::Div => 1,
        }
    }
}

impl From<BinaryOpKind> for BinaryOp {
    fn from(kind: BinaryOpKind) -> Self {
        match kind {
            BinaryOpKind::PLUS => BinaryOp::Add,
            BinaryOpKind::MINUS => BinaryOp::Sub,
            BinaryOpKind::STAR => BinaryOp::Mul,
            BinaryOpKind::SLASH => BinaryOp::Div,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BinaryExpr<'a> {
    op: BinaryOp,
    exprs: [Expr<'a>; 2],
}

impl<'a> BinaryExpr<'a> {
    pub fn new(op: BinaryOp, lhs: Expr<'a>, rhs: Expr<'a>) -> Self {
        BinaryExpr { op, exprs: [lhs, rhs] }
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    pub fn lhs(&self) -> &Expr<'a> {
        &self.exprs[0]
    }

    pub fn rhs(&self) -> &Expr<'a> {
        &self.exprs[1]
    }
}
