use std::fmt::{ self, Write as _ };

use thiserror::Error;
use tracing::{ debug, warn };

use crate::ast::expr::{ BinaryExpr, BinaryOp, Expr, Term };
use crate::ast::stmt::{ IfPred, IfStmt, Program, Scope, Stmt };

/// Size in bytes of one operand stack slot.
pub const SLOT_SIZE: usize = 8;

const SYS_EXIT: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    #[error("undeclared identifier `{name}` on line {line}")]
    Undeclared { name: String, line: usize },
}

/// Conditions that still produce a complete listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenWarning {
    #[error("identifier `{name}` already used, declared again on line {line}")]
    Redeclared { name: String, line: usize },
}

#[derive(Debug)]
struct Var<'a> {
    name: &'a str,
    stack_loc: usize,
    // false while the initializer of its own `let` is being generated
    ready: bool,
}

/// Lowers a program to NASM x86-64 assembly for Linux, evaluating every
/// expression on the machine stack.
///
/// `stack_size` mirrors the depth of the real stack in slots. It must only
/// change through `push`, `pop` and `end_scope`, otherwise the `rsp`
/// relative offsets of variables go stale.
pub struct AsmGen<'a> {
    output: String,
    stack_size: usize,
    vars: Vec<Var<'a>>,
    scopes: Vec<usize>,
    label_count: usize,
    warnings: Vec<GenWarning>,
}

impl<'a> AsmGen<'a> {
    pub fn new() -> Self {
        AsmGen {
            output: String::new(),
            stack_size: 0,
            vars: Vec::new(),
            scopes: Vec::new(),
            label_count: 0,
            warnings: Vec::new(),
        }
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    pub fn warnings(&self) -> &[GenWarning] {
        &self.warnings
    }

    pub fn gen_program(&mut self, program: &Program<'a>) -> Result<String, GenError> {
        self.output.push_str("global _start\n_start:\n");

        for stmt in program.stmts() {
            self.gen_stmt(stmt)?;
        }

        // reached when the program falls off its end
        self.emit(format_args!("mov rax, {SYS_EXIT}"));
        self.emit(format_args!("mov rdi, 0"));
        self.emit(format_args!("syscall"));

        debug!(labels = self.label_count, warnings = self.warnings.len(), "generated assembly");
        Ok(std::mem::take(&mut self.output))
    }

    pub fn gen_stmt(&mut self, stmt: &Stmt<'a>) -> Result<(), GenError> {
        match stmt {
            Stmt::Exit(exit) => {
                self.gen_expr(exit.status())?;
                self.emit(format_args!("mov rax, {SYS_EXIT}"));
                self.pop("rdi");
                self.emit(format_args!("syscall"));
            }

            Stmt::Let(let_stmt) => {
                let ident = let_stmt.ident();
                if self.lookup(ident.name()).is_some() {
                    let warning = GenWarning::Redeclared {
                        name: ident.name().to_string(),
                        line: ident.line(),
                    };
                    warn!(name = ident.name(), line = ident.line(), "identifier already used");
                    self.warnings.push(warning);
                }

                self.vars.push(Var { name: ident.name(), stack_loc: self.stack_size, ready: false });
                self.gen_expr(let_stmt.initializer())?;
                if let Some(var) = self.vars.last_mut() {
                    var.ready = true;
                }
            }

            Stmt::Assign(assign) => {
                let ident = assign.ident();
                self.gen_expr(assign.value())?;
                self.pop("rax");

                let offset = self.resolve(ident.name(), ident.line())?;
                self.emit(format_args!("mov [rsp + {offset}], rax"));
            }

            Stmt::Scope(scope) => self.gen_scope(scope)?,

            Stmt::If(if_stmt) => self.gen_if(if_stmt)?,
        }

        Ok(())
    }

    pub fn gen_scope(&mut self, scope: &Scope<'a>) -> Result<(), GenError> {
        self.begin_scope();
        for stmt in scope.stmts() {
            self.gen_stmt(stmt)?;
        }
        self.end_scope();

        Ok(())
    }

    fn gen_if(&mut self, stmt: &IfStmt<'a>) -> Result<(), GenError> {
        let false_label = self.gen_condition(stmt.cond())?;
        self.gen_scope(stmt.then())?;

        match stmt.pred() {
            Some(pred) => {
                let end_label = self.create_label();
                self.emit(format_args!("jmp {end_label}"));
                self.place_label(&false_label);
                self.gen_if_pred(pred, &end_label)?;
                self.place_label(&end_label);
            }

            None => self.place_label(&false_label),
        }

        Ok(())
    }

    fn gen_if_pred(&mut self, pred: &IfPred<'a>, end_label: &str) -> Result<(), GenError> {
        match pred {
            IfPred::Elif(elif) => {
                let false_label = self.gen_condition(elif.cond())?;
                self.gen_scope(elif.scope())?;
                self.emit(format_args!("jmp {end_label}"));
                self.place_label(&false_label);

                if let Some(next) = elif.next() {
                    self.gen_if_pred(next, end_label)?;
                }
            }

            IfPred::Else(scope) => self.gen_scope(scope)?,
        }

        Ok(())
    }

    // jumps to the returned label when `cond` evaluates to zero
    fn gen_condition(&mut self, cond: &Expr<'a>) -> Result<String, GenError> {
        self.gen_expr(cond)?;
        self.pop("rax");

        let label = self.create_label();
        self.emit(format_args!("test rax, rax"));
        self.emit(format_args!("jz {label}"));
        Ok(label)
    }

    pub fn gen_expr(&mut self, expr: &Expr<'a>) -> Result<(), GenError> {
        match expr {
            Expr::Term(term) => self.gen_term(term),
            Expr::Binary(binary) => self.gen_binary_expr(binary),
        }
    }

    fn gen_term(&mut self, term: &Term<'a>) -> Result<(), GenError> {
        match term {
            Term::IntLit(lit) => {
                self.emit(format_args!("mov rax, {}", lit.value()));
                self.push("rax");
            }

            Term::Ident(ident) => {
                let offset = self.resolve(ident.name(), ident.line())?;
                self.push(&format!("QWORD [rsp + {offset}]"));
            }

            Term::Paren(expr) => self.gen_expr(expr)?,
        }

        Ok(())
    }

    // the right operand is evaluated first so the left one ends up on top
    fn gen_binary_expr(&mut self, binary: &BinaryExpr<'a>) -> Result<(), GenError> {
        self.gen_expr(binary.rhs())?;
        self.gen_expr(binary.lhs())?;
        self.pop("rax");
        self.pop("rbx");

        match binary.op() {
            BinaryOp::Add => self.emit(format_args!("add rax, rbx")),

            BinaryOp::Sub => self.emit(format_args!("sub rax, rbx")),

            BinaryOp::Mul => self.emit(format_args!("mul rbx")),

            BinaryOp::Div => {
                // div takes rdx:rax as the dividend
                self.emit(format_args!("xor rdx, rdx"));
                self.emit(format_args!("div rbx"));
            }
        }

        self.push("rax");
        Ok(())
    }

    // first match wins, a redeclared name keeps resolving to its oldest slot
    fn lookup(&self, name: &str) -> Option<&Var<'a>> {
        self.vars.iter().find(|var| var.name == name)
    }

    /// Byte offset of `name` from `rsp`. A name whose own initializer is
    /// still being generated counts as undeclared.
    fn resolve(&self, name: &str, line: usize) -> Result<usize, GenError> {
        self.lookup(name)
            .filter(|var| var.ready)
            .and_then(|var| self.stack_size.checked_sub(var.stack_loc + 1))
            .map(|slots| slots * SLOT_SIZE)
            .ok_or_else(|| GenError::Undeclared { name: name.to_string(), line })
    }

    fn emit(&mut self, instr: fmt::Arguments<'_>) {
        // writing into a String cannot fail
        let _ = writeln!(self.output, "    {instr}");
    }

    fn place_label(&mut self, label: &str) {
        let _ = writeln!(self.output, "{label}:");
    }

    fn push(&mut self, operand: &str) {
        self.emit(format_args!("push {operand}"));
        self.stack_size += 1;
    }

    fn pop(&mut self, reg: &str) {
        self.emit(format_args!("pop {reg}"));
        self.stack_size -= 1;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(self.vars.len());
    }

    // releases every slot declared since the matching `begin_scope` at once
    fn end_scope(&mut self) {
        let Some(watermark) = self.scopes.pop() else {
            return;
        };

        let pop_count = self.vars.len() - watermark;
        if pop_count > 0 {
            self.emit(format_args!("add rsp, {}", pop_count * SLOT_SIZE));
        }
        self.stack_size -= pop_count;
        self.vars.truncate(watermark);
    }

    fn create_label(&mut self) -> String {
        let label = format!("label{}", self.label_count);
        self.label_count += 1;
        label
    }
}

impl Default for AsmGen<'_> {
    fn default() -> Self {
        AsmGen::new()
    }
}
