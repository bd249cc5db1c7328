use std::collections::HashMap;

use crate::lex::token::{ TokenKind, KeywordKind };

pub const KEYWORD_KIND_LIST: &[KeywordKind] = &[
    KeywordKind::EXIT,
    KeywordKind::LET,
    KeywordKind::IF,
    KeywordKind::ELIF,
    KeywordKind::ELSE,
];

// character trie over the keyword spellings, `elif` and `else` share a prefix
pub struct KeywordMatcher {
    start_node: MatcherNode,
}

#[derive(Default)]
struct MatcherNode {
    children: HashMap<char, MatcherNode>,
    kind: Option<TokenKind>,
}

impl MatcherNode {
    fn insert(&mut self, mut chars: std::str::Chars<'_>, kind: TokenKind) {
        match chars.next() {
            Some(c) => self.children.entry(c).or_default().insert(chars, kind),
            None => self.kind = Some(kind),
        }
    }
}

impl KeywordMatcher {
    pub fn new() -> Self {
        let mut start_node = MatcherNode::default();

        for keyword in KEYWORD_KIND_LIST {
            start_node.insert(keyword.spelling().chars(), TokenKind::from(keyword.clone()));
        }

        KeywordMatcher { start_node }
    }

    pub fn search_str(&self, s: &str) -> Option<TokenKind> {
        let mut curr = &self.start_node;

        for c in s.chars() {
            if let Some(node) = curr.children.get(&c) {
                curr = node;
            }
            else {
                return None;
            }
        }

        curr.kind
    }
}
