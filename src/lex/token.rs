use subenum::subenum;

#[subenum(KeywordKind, BinaryOpKind)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[subenum(KeywordKind)]
    EXIT,

    #[subenum(KeywordKind)]
    LET,

    #[subenum(KeywordKind)]
    IF,

    #[subenum(KeywordKind)]
    ELIF,

    #[subenum(KeywordKind)]
    ELSE,

    #[subenum(BinaryOpKind)]
    PLUS,

    #[subenum(BinaryOpKind)]
    MINUS,

    #[subenum(BinaryOpKind)]
    STAR,

    #[subenum(BinaryOpKind)]
    SLASH,

    EQ,
    SEMI,
    LPAREN,
    RPAREN,
    LCURLY,
    RCURLY,

    INT,
    ID,
    EOF,
}

impl TokenKind {
    // used by parser diagnostics: "expected ';' on line 3"
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::EXIT => "'exit'",
            TokenKind::LET => "'let'",
            TokenKind::IF => "'if'",
            TokenKind::ELIF => "'elif'",
            TokenKind::ELSE => "'else'",
            TokenKind::PLUS => "'+'",
            TokenKind::MINUS => "'-'",
            TokenKind::STAR => "'*'",
            TokenKind::SLASH => "'/'",
            TokenKind::EQ => "'='",
            TokenKind::SEMI => "';'",
            TokenKind::LPAREN => "'('",
            TokenKind::RPAREN => "')'",
            TokenKind::LCURLY => "'{'",
            TokenKind::RCURLY => "'}'",
            TokenKind::INT => "integer literal",
            TokenKind::ID => "identifier",
            TokenKind::EOF => "end of file",
        }
    }
}

impl KeywordKind {
    pub fn spelling(&self) -> &'static str {
        match self {
            KeywordKind::EXIT => "exit",
            KeywordKind::LET => "let",
            KeywordKind::IF => "if",
            KeywordKind::ELIF => "elif",
            KeywordKind::ELSE => "else",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    kind: TokenKind,
    line: usize,
    lexeme: &'s str,
}

impl<'s> Token<'s> {
    pub fn new(kind: TokenKind, line: usize, lexeme: &'s str) -> Self {
        Token { kind, line, lexeme }
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn lexeme(&self) -> &'s str {
        self.lexeme
    }

    /// Textual payload, only carried by identifiers and integer literals.
    pub fn value(&self) -> Option<&'s str> {
        match self.kind {
            TokenKind::ID | TokenKind::INT => Some(self.lexeme),
            _ => None,
        }
    }
}
