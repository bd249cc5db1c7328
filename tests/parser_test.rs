use newtonc::arena::{ Arena, ArenaError };
use newtonc::ast::expr::{ BinaryOp, Expr, Term };
use newtonc::ast::stmt::{ IfPred, Program, Stmt };
use newtonc::lex::lex_all;
use newtonc::parse::parser::{ MAX_NESTING_DEPTH, ParseError, Parser };

fn parse<'a>(src: &'a str, arena: &'a Arena) -> Result<Program<'a>, ParseError> {
    Parser::new(lex_all(src), arena).parse_all()
}

// renders an expression fully parenthesized so grouping is visible
fn render(expr: &Expr) -> String {
    match expr {
        Expr::Term(term) => match term {
            Term::IntLit(lit) => lit.value().to_string(),
            Term::Ident(ident) => ident.name().to_string(),
            Term::Paren(inner) => render(inner),
        },

        Expr::Binary(binary) => {
            let op = match binary.op() {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::Div => "/",
            };
            format!("({} {} {})", render(binary.lhs()), op, render(binary.rhs()))
        }
    }
}

fn render_exit(src: &str) -> String {
    let arena = Arena::default();
    let program = parse(src, &arena).expect("program should parse");

    match program.stmts() {
        [Stmt::Exit(exit)] => render(exit.status()),
        other => panic!("expected a single exit statement, got {:?}", other),
    }
}

/* --- expressions --- */

#[test]
fn parse_integer_literal_expr() {
    let arena = Arena::default();
    let mut parser = Parser::new(lex_all("123"), &arena);

    let expr = parser
        .parse_expr(0)
        .expect("no error")
        .expect("integer literal should parse");

    assert!(matches!(expr, Expr::Term(Term::IntLit(lit)) if lit.value() == "123"));
}

#[test]
fn non_expression_yields_none() {
    let arena = Arena::default();
    let mut parser = Parser::new(lex_all(";"), &arena);
    assert!(matches!(parser.parse_expr(0), Ok(None)));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(render_exit("exit(1 + 2 * 3);"), "(1 + (2 * 3))");
    assert_eq!(render_exit("exit(2 * 3 + 1);"), "((2 * 3) + 1)");
}

#[test]
fn equal_precedence_associates_left() {
    assert_eq!(render_exit("exit(8 - 3 - 2);"), "((8 - 3) - 2)");
    assert_eq!(render_exit("exit(a / b * c);"), "((a / b) * c)");
}

#[test]
fn mixed_chain() {
    assert_eq!(
        render_exit("exit(1 - 2 * 3 + 4 / 2);"),
        "((1 - (2 * 3)) + (4 / 2))"
    );
}

#[test]
fn parentheses_group() {
    assert_eq!(render_exit("exit((1 + 2) * 3);"), "((1 + 2) * 3)");
}

#[test]
fn identifier_keeps_its_line() {
    let arena = Arena::default();
    let program = parse("let a = 1;\n\nexit(a);", &arena).unwrap();

    let Stmt::Exit(exit) = program.stmts()[1] else { panic!("expected exit") };
    let Expr::Term(Term::Ident(ident)) = exit.status() else { panic!("expected identifier") };
    assert_eq!(ident.name(), "a");
    assert_eq!(ident.line(), 3);
}

/* --- statements --- */

#[test]
fn every_statement_kind() {
    let src = "
        let x = 1;
        x = x + 1;
        { exit(x); }
        if (x) { } else { }
        exit(0);
    ";
    let arena = Arena::default();
    let program = parse(src, &arena).unwrap();

    let stmts = program.stmts();
    assert_eq!(stmts.len(), 5);
    assert!(matches!(stmts[0], Stmt::Let(l) if l.ident().name() == "x"));
    assert!(matches!(stmts[1], Stmt::Assign(a) if a.ident().name() == "x"));
    assert!(matches!(stmts[2], Stmt::Scope(s) if s.stmts().len() == 1));
    assert!(matches!(stmts[3], Stmt::If(_)));
    assert!(matches!(stmts[4], Stmt::Exit(_)));
}

#[test]
fn scope_keeps_statement_order() {
    let arena = Arena::default();
    let program = parse("{ let a = 1; let b = 2; let c = 3; }", &arena).unwrap();

    let Stmt::Scope(scope) = program.stmts()[0] else { panic!("expected scope") };
    let names: Vec<&str> = scope.stmts().iter()
        .map(|stmt| match stmt {
            Stmt::Let(l) => l.ident().name(),
            _ => panic!("expected let"),
        })
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn if_predicate_chain_is_linked() {
    let src = "if (0) { exit(1); } elif (1) { exit(2); } elif (2) { } else { exit(3); }";
    let arena = Arena::default();
    let program = parse(src, &arena).unwrap();

    let Stmt::If(if_stmt) = program.stmts()[0] else { panic!("expected if") };
    assert_eq!(if_stmt.then().stmts().len(), 1);

    let Some(IfPred::Elif(first)) = if_stmt.pred() else { panic!("expected elif") };
    assert_eq!(render(first.cond()), "1");
    let Some(IfPred::Elif(second)) = first.next() else { panic!("expected second elif") };
    assert_eq!(render(second.cond()), "2");
    assert!(second.scope().stmts().is_empty());
    let Some(IfPred::Else(scope)) = second.next() else { panic!("expected else") };
    assert_eq!(scope.stmts().len(), 1);
}

#[test]
fn duplicate_and_undeclared_names_are_not_parse_errors() {
    let arena = Arena::default();
    assert!(parse("let a = 1; let a = 2; b = c;", &arena).is_ok());
}

/* --- errors --- */

fn expected(src: &str) -> ParseError {
    let arena = Arena::default();
    parse(src, &arena).expect_err("program should be rejected")
}

#[test]
fn missing_semicolon() {
    assert_eq!(expected("exit(1)"), ParseError::Expected { expected: "';'", line: 1 });
}

#[test]
fn missing_expression() {
    assert_eq!(expected("let x = ;"), ParseError::Expected { expected: "expression", line: 1 });
    assert_eq!(expected("exit(1 +\n);"), ParseError::Expected { expected: "expression", line: 1 });
}

#[test]
fn missing_closing_paren() {
    assert_eq!(expected("exit((1);"), ParseError::Expected { expected: "')'", line: 1 });
}

#[test]
fn missing_scope_after_condition() {
    assert_eq!(expected("if (1)\n exit(1);"), ParseError::Expected { expected: "scope", line: 1 });
    assert_eq!(expected("if (1) { } else exit(2);"), ParseError::Expected { expected: "scope", line: 1 });
}

#[test]
fn unclosed_scope() {
    assert_eq!(expected("{\nlet a = 1;\n"), ParseError::Expected { expected: "'}'", line: 2 });
}

#[test]
fn identifier_without_assignment_is_not_a_statement() {
    assert_eq!(expected("let a = 1;\na;"), ParseError::Expected { expected: "statement", line: 1 });
}

#[test]
fn let_needs_an_identifier() {
    assert_eq!(expected("let 5 = 1;"), ParseError::Expected { expected: "identifier", line: 1 });
}

#[test]
fn dangling_elif_is_rejected() {
    assert_eq!(expected("elif (1) { }"), ParseError::Expected { expected: "statement", line: 1 });
}

/* --- arena --- */

#[test]
fn parse_fails_cleanly_when_arena_is_exhausted() {
    let mut src = String::new();
    for _ in 0..200 {
        src.push_str("exit(1 + 2 * 3);\n");
    }

    let arena = Arena::with_capacity(256);
    let err = parse(&src, &arena).expect_err("arena is too small");
    assert!(matches!(err, ParseError::Arena(ArenaError::Exhausted { capacity: 256, .. })));
    assert!(arena.used() <= arena.capacity());
}

#[test]
fn parse_within_capacity_stays_within_capacity() {
    let arena = Arena::with_capacity(4096);
    parse("let a = 1; { a = a * 2; } exit(a);", &arena).unwrap();
    assert!(arena.used() > 0);
    assert!(arena.used() <= 4096);
}

/* --- nesting --- */

fn nested(open: &str, inner: &str, close: &str, levels: usize) -> String {
    format!("{}{}{}", open.repeat(levels), inner, close.repeat(levels))
}

#[test]
fn deeply_nested_parentheses_are_rejected() {
    let src = format!("exit({});", nested("(", "1", ")", 10_000));
    assert_eq!(expected(&src), ParseError::TooDeep { line: 1 });
}

#[test]
fn deeply_nested_scopes_are_rejected() {
    // one brace per line, the first one past the limit is reported
    let src = nested("{\n", "exit(1);", "}", 10_000);
    let err = expected(&src);
    assert_eq!(err, ParseError::TooDeep { line: MAX_NESTING_DEPTH + 1 });
}

#[test]
fn long_operator_chain_is_rejected() {
    let src = format!("exit(1{});", " + 1".repeat(10_000));
    assert!(matches!(expected(&src), ParseError::TooDeep { .. }));
}

#[test]
fn long_elif_chain_is_rejected() {
    let src = format!("if (0) {{ }}{}", " elif (0) { }".repeat(10_000));
    assert!(matches!(expected(&src), ParseError::TooDeep { .. }));
}

#[test]
fn nesting_up_to_the_limit_parses() {
    let src = format!("exit({});", nested("(", "7", ")", MAX_NESTING_DEPTH));
    assert_eq!(render_exit(&src), "7");

    let src = format!("exit(1{});", " + 1".repeat(MAX_NESTING_DEPTH - 1));
    let arena = Arena::default();
    assert!(parse(&src, &arena).is_ok());
}
