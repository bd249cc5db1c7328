use std::cmp::{ max, min };

use thiserror::Error;
use tracing::warn;

use crate::lex::token::{ Token, TokenKind };
use crate::lex::keyword::KeywordMatcher;

/// Non-fatal lexical diagnostics. The offending input is skipped and
/// scanning continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("invalid character {ch:?} on line {line}")]
    InvalidCharacter { ch: char, line: usize },

    #[error("unterminated block comment starting on line {line}")]
    UnterminatedComment { line: usize },
}

pub struct Lexer<'s> {
    pos: LexState<'s>,
    line: usize,
    keyword_matcher: KeywordMatcher,
    eof: bool,
    errors: Vec<LexError>,
}

impl<'s> Lexer<'s> {
    pub fn new(input: &'s str) -> Self {
        Lexer {
            pos: LexState::new(input, 0),
            line: 1,
            keyword_matcher: KeywordMatcher::new(),
            eof: false,
            errors: Vec::new(),
        }
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn handle_eof(&mut self) -> Option<Token<'s>> {
        if self.eof {
            None
        }
        else {
            self.eof = true;
            Some(Token::new(TokenKind::EOF, self.line, ""))
        }
    }

    fn report(&mut self, err: LexError) {
        warn!(error = %err, "lexical error");
        self.errors.push(err);
    }

    /// Lexes the whole input. The returned sequence always ends with exactly
    /// one `EOF` token.
    pub fn tokenize(&mut self) -> Vec<Token<'s>> {
        let mut out = Vec::new();
        while let Some(tok) = self.lex() {
            out.push(tok);
        }
        out
    }

    pub fn lex(&mut self) -> Option<Token<'s>> {
        // each iteration consumes exactly one character `curr` first,
        // `start` points at it and `pos` at the character after it
        loop {
            let Some(curr) = self.pos.get() else {
                return self.handle_eof();
            };
            let start = self.pos.pre_inc();

            let kind = match curr {
                '\n' => {
                    self.line += 1;
                    continue;
                }

                c if c.is_whitespace() => continue,

                '/' if self.pos.get() == Some('/') => {
                    // the newline is left for the branch above so the line counts
                    while let Some(next) = self.pos.get() {
                        if next == '\n' {
                            break;
                        }
                        self.pos.inc();
                    }
                    continue;
                }

                '/' if self.pos.get() == Some('*') => {
                    self.pos.inc();
                    self.skip_block_comment();
                    continue;
                }

                '0'..='9' => {
                    while self.pos.get().is_some_and(|next| next.is_ascii_digit()) {
                        self.pos.inc();
                    }
                    return Some(start.form_token(&self.pos, TokenKind::INT, self.line));
                }

                c if c.is_ascii_alphabetic() => {
                    while self.pos.get().is_some_and(|next| next.is_ascii_alphabetic()) {
                        self.pos.inc();
                    }

                    let s = start.form_str(&self.pos);
                    let kind = self.keyword_matcher.search_str(s)
                        .unwrap_or(TokenKind::ID);

                    return Some(start.form_token(&self.pos, kind, self.line));
                }

                '+' => TokenKind::PLUS,

                '-' => TokenKind::MINUS,

                '*' => TokenKind::STAR,

                '/' => TokenKind::SLASH,

                '=' => TokenKind::EQ,

                ';' => TokenKind::SEMI,

                '(' => TokenKind::LPAREN,

                ')' => TokenKind::RPAREN,

                '{' => TokenKind::LCURLY,

                '}' => TokenKind::RCURLY,

                _ => {
                    let line = self.line;
                    self.report(LexError::InvalidCharacter { ch: curr, line });
                    continue;
                }
            };

            return Some(self.pos.form_token(&start, kind, self.line));
        }
    }

    // called with `pos` right after the opening "/*"
    fn skip_block_comment(&mut self) {
        let opened_on = self.line;
        loop {
            match self.pos.get_inc() {
                Some('*') if self.pos.get() == Some('/') => {
                    self.pos.inc();
                    return;
                }

                Some('\n') => self.line += 1,

                Some(_) => {}

                None => {
                    self.report(LexError::UnterminatedComment { line: opened_on });
                    return;
                }
            }
        }
    }
}

#[derive(Copy, Clone)]
struct LexState<'s> {
    input: &'s str,
    current: usize,
}

impl<'s> LexState<'s> {
    fn new(input: &'s str, pos: usize) -> Self {
        LexState { input, current: pos }
    }

    fn get(&self) -> Option<char> {
        self.input[self.current..].chars().next()
    }

    fn pre_inc(&mut self) -> Self {
        let pre = *self;

        self.inc();

        pre
    }

    fn inc(&mut self) -> &mut Self {
        if let Some(c) = self.get() {
            self.current += c.len_utf8();
        }

        self
    }

    fn get_inc(&mut self) -> Option<char> {
        let ret = self.get();
        self.inc();
        ret
    }

    fn form_str(&self, other: &Self) -> &'s str {
        let left = min(self.current, other.current);
        let right = max(self.current, other.current);

        &self.input[left..right]
    }

    fn form_token(&self, other: &Self, kind: TokenKind, line: usize) -> Token<'s> {
        Token::new(kind, line, self.form_str(other))
    }
}
