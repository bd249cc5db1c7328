use crate::ast::expr::{ Expr, Ident };

// consider this a union of arena references
#[derive(Clone, Copy, Debug)]
pub enum Stmt<'a> {
    Exit(&'a ExitStmt<'a>),
    Let(&'a LetStmt<'a>),
    Scope(&'a Scope<'a>),
    If(&'a IfStmt<'a>),
    Assign(&'a AssignStmt<'a>),
}

#[derive(Clone, Copy, Debug)]
pub struct ExitStmt<'a> {
    status: Expr<'a>,
}

impl<'a> ExitStmt<'a> {
    pub fn new(status: Expr<'a>) -> Self {
        ExitStmt { status }
    }

    pub fn status(&self) -> &Expr<'a> {
        &self.status
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LetStmt<'a> {
    ident: Ident<'a>,
    initializer: Expr<'a>,
}

impl<'a> LetStmt<'a> {
    pub fn new(ident: Ident<'a>, initializer: Expr<'a>) -> Self {
        LetStmt { ident, initializer }
    }

    pub fn ident(&self) -> &Ident<'a> {
        &self.ident
    }

    pub fn initializer(&self) -> &Expr<'a> {
        &self.initializer
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AssignStmt<'a> {
    ident: Ident<'a>,
    value: Expr<'a>,
}

impl<'a> AssignStmt<'a> {
    pub fn new(ident: Ident<'a>, value: Expr<'a>) -> Self {
        AssignStmt { ident, value }
    }

    pub fn ident(&self) -> &Ident<'a> {
        &self.ident
    }

    pub fn value(&self) -> &Expr<'a> {
        &self.value
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Scope<'a> {
    stmts: &'a [Stmt<'a>],
}

impl<'a> Scope<'a> {
    pub fn new(stmts: &'a [Stmt<'a>]) -> Self {
        Scope { stmts }
    }

    pub fn stmts(&self) -> &'a [Stmt<'a>] {
        self.stmts
    }
}

#[derive(Clone, Copy, Debug)]
pub struct IfStmt<'a> {
    condition: Expr<'a>,
    then_branch: &'a Scope<'a>,
    pred: Option<&'a IfPred<'a>>,
}

impl<'a> IfStmt<'a> {
    pub fn new(condition: Expr<'a>, then_branch: &'a Scope<'a>, pred: Option<&'a IfPred<'a>>) -> Self {
        IfStmt { condition, then_branch, pred }
    }

    pub fn cond(&self) -> &Expr<'a> {
        &self.condition
    }

    pub fn then(&self) -> &'a Scope<'a> {
        self.then_branch
    }

    pub fn pred(&self) -> Option<&'a IfPred<'a>> {
        self.pred
    }
}

/// Tail of an `if` statement, a chain of `elif` links optionally closed by
/// an `else`.
#[derive(Clone, Copy, Debug)]
pub enum IfPred<'a> {
    Elif(&'a ElifBranch<'a>),
    Else(&'a Scope<'a>),
}

#[derive(Clone, Copy, Debug)]
pub struct ElifBranch<'a> {
    condition: Expr<'a>,
    scope: &'a Scope<'a>,
    next: Option<&'a IfPred<'a>>,
}

impl<'a> ElifBranch<'a> {
    pub fn new(condition: Expr<'a>, scope: &'a Scope<'a>, next: Option<&'a IfPred<'a>>) -> Self {
        ElifBranch { condition, scope, next }
    }

    pub fn cond(&self) -> &Expr<'a> {
        &self.condition
    }

    pub fn scope(&self) -> &'a Scope<'a> {
        self.scope
    }

    pub fn next(&self) -> Option<&'a IfPred<'a>> {
        self.next
    }
}

#[derive(Clone, Debug, Default)]
pub struct Program<'a> {
    stmts: Vec<Stmt<'a>>,
}

impl<'a> Program<'a> {
    pub fn new(stmts: Vec<Stmt<'a>>) -> Self {
        Program { stmts }
    }

    pub fn stmts(&self) -> &[Stmt<'a>] {
        &self.stmts
    }
}
