use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Kinds of tokens produced by [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Star,
    And,
    Or,
    Not,
    UnquotedWord,
    QuotedWord,
    RegexWord,
    CaseInsensitiveModifier,
    Error,
}

impl TokenKind {
    pub fn is_word(self) -> bool {
        matches!(
            self,
            TokenKind::UnquotedWord | TokenKind::QuotedWord | TokenKind::RegexWord
        )
    }
}

/// A single lexical token of a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text for words, message for errors, `None` otherwise.
    pub text: Option<String>,
    /// Zero-based byte offset of the token start.
    pub position: usize,
}

impl Token {
    fn symbol(kind: TokenKind, position: usize) -> Self {
        Self {
            kind,
            text: None,
            position,
        }
    }

    fn word(kind: TokenKind, text: String, position: usize) -> Self {
        Self {
            kind,
            text: Some(text),
            position,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// True for an unquoted word spelled exactly `word`, ignoring ASCII case.
    pub fn is_bare(&self, word: &str) -> bool {
        self.kind == TokenKind::UnquotedWord && self.text().eq_ignore_ascii_case(word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::LeftBracket => f.write_str("'('"),
            TokenKind::RightBracket => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Star => f.write_str("'*'"),
            TokenKind::And => f.write_str("'and'"),
            TokenKind::Or => f.write_str("'or'"),
            TokenKind::Not => f.write_str("'not'"),
            TokenKind::UnquotedWord | TokenKind::QuotedWord => write!(f, "word '{}'", self.text()),
            TokenKind::RegexWord => write!(f, "regex /{}/", self.text()),
            TokenKind::CaseInsensitiveModifier => f.write_str("regex modifier 'i'"),
            TokenKind::Error => f.write_str(self.text()),
        }
    }
}

/// Split a filter expression into tokens.
///
/// Blank input yields no tokens. An unterminated quoted or regex literal
/// produces a trailing [`TokenKind::Error`] token and stops the scan.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).run()
}

/// Like [`tokenize`], treating a missing expression as blank.
pub fn tokenize_optional(input: Option<&str>) -> Vec<Token> {
    input.map(tokenize).unwrap_or_default()
}

fn single_char_kind(c: char) -> Option<TokenKind> {
    match c {
        '(' => Some(TokenKind::LeftBracket),
        ')' => Some(TokenKind::RightBracket),
        ',' => Some(TokenKind::Comma),
        ':' => Some(TokenKind::Colon),
        '*' => Some(TokenKind::Star),
        _ => None,
    }
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    if word.eq_ignore_ascii_case("and") {
        Some(TokenKind::And)
    } else if word.eq_ignore_ascii_case("or") {
        Some(TokenKind::Or)
    } else if word.eq_ignore_ascii_case("not") {
        Some(TokenKind::Not)
    } else {
        None
    }
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(&(position, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else if let Some(kind) = single_char_kind(c) {
                self.chars.next();
                self.tokens.push(Token::symbol(kind, position));
            } else if matches!(c, '"' | '\'' | '/') {
                if !self.delimited_word(position, c) {
                    break;
                }
                if c == '/' {
                    self.case_insensitive_modifier();
                }
            } else {
                self.unquoted_word(position);
            }
        }
        self.tokens
    }

    /// Returns false when the literal was left open.
    fn delimited_word(&mut self, start: usize, delimiter: char) -> bool {
        self.chars.next();
        let mut text = String::new();

        loop {
            match self.chars.next() {
                None => {
                    self.tokens.push(Token::word(
                        TokenKind::Error,
                        format!("missing closing delimiter {delimiter}"),
                        self.input.len(),
                    ));
                    return false;
                }
                Some((_, c)) if c == delimiter => break,
                Some((_, '\\')) => match self.chars.peek().map(|&(_, next)| next) {
                    Some(next) if next == delimiter || (next == '\\' && delimiter != '/') => {
                        text.push(next);
                        self.chars.next();
                    }
                    Some(next) => {
                        text.push('\\');
                        text.push(next);
                        self.chars.next();
                    }
                    // falls through to the unterminated case on the next turn
                    None => text.push('\\'),
                },
                Some((_, c)) => text.push(c),
            }
        }

        let kind = if delimiter == '/' {
            TokenKind::RegexWord
        } else {
            TokenKind::QuotedWord
        };
        self.tokens.push(Token::word(kind, text, start));
        true
    }

    fn case_insensitive_modifier(&mut self) {
        if let Some(&(position, 'i')) = self.chars.peek() {
            self.chars.next();
            self.tokens
                .push(Token::symbol(TokenKind::CaseInsensitiveModifier, position));
        }
    }

    fn unquoted_word(&mut self, start: usize) {
        let mut rest = self.input[start..].chars();
        let split = match (rest.next(), rest.next()) {
            // operator symbols never begin a longer word
            (Some(symbol @ ('!' | '|' | '&')), _) => Some(symbol),
            // a `~` glued to a literal is the regex marker of the value after it
            (Some('~'), Some('"' | '\'' | '/')) => Some('~'),
            _ => None,
        };
        if let Some(symbol) = split {
            self.chars.next();
            self.tokens
                .push(Token::word(TokenKind::UnquotedWord, symbol.to_string(), start));
            return;
        }

        let mut end = start;
        while let Some(&(position, c)) = self.chars.peek() {
            if c.is_whitespace() || single_char_kind(c).is_some() {
                break;
            }
            end = position + c.len_utf8();
            self.chars.next();
        }

        let word = &self.input[start..end];
        let token = match keyword_kind(word) {
            Some(kind) => Token::symbol(kind, start),
            None => Token::word(TokenKind::UnquotedWord, word.to_string(), start),
        };
        self.tokens.push(token);
    }
}
