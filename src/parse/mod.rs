pub mod parser;

pub const PARSER_RULES: &'static str = r#"
program
    : stmt* EOF
    ;

stmt: exit_stmt
    | let_stmt
    | assign_stmt
    | scope
    | if_stmt
    ;

exit_stmt
    : EXIT LPAREN expr RPAREN SEMI
    ;

let_stmt
    : LET ID EQ expr SEMI
    ;

assign_stmt
    : ID EQ expr SEMI
    ;

scope
    : LCURLY stmt* RCURLY
    ;

if_stmt
    : IF LPAREN expr RPAREN scope if_pred?
    ;

if_pred
    : ELIF LPAREN expr RPAREN scope if_pred?
    | ELSE scope
    ;

expr: term (bin_op expr)*
    ;

bin_op
    : PLUS | MINUS      // precedence 0
    | STAR | SLASH      // precedence 1
    ;

term: INT
    | ID
    | LPAREN expr RPAREN
    ;
"#;
