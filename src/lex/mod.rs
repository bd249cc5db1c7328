pub mod token;
pub mod lexer;
mod keyword;

use crate::lex::lexer::Lexer;
use crate::lex::token::Token;

pub const LEXER_RULES: &'static str = r#"
EXIT : 'exit';
LET : 'let';
IF : 'if';
ELIF : 'elif';
ELSE : 'else';

PLUS : '+';
MINUS : '-';
STAR : '*';
SLASH : '/';
EQ : '=' ;
SEMI : ';' ;
LPAREN : '(' ;
RPAREN : ')' ;
LCURLY : '{' ;
RCURLY : '}' ;

INT : [0-9]+;
ID: [a-zA-Z]+;

LINE_COMMENT : '//' ~[\n]* -> skip ;
BLOCK_COMMENT : '/*' .*? '*/' -> skip ;
WS: [ \t\n\r\f]+ -> skip ;
"#;

/// Lexes `src` to completion. Invalid characters are dropped and the
/// collected [`LexError`](crate::lex::lexer::LexError)s are discarded; use
/// [`Lexer`] directly when the diagnostics are needed.
pub fn lex_all(src: &str) -> Vec<Token<'_>> {
    Lexer::new(src).tokenize()
}
