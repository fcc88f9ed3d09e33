//! Tokenizer for the playground's SQL subset.
//!
//! Every token keeps its byte span in the source so the parser can slice the
//! raw text of a `WHERE` clause back out.

use crate::error::ExecResult;
use std::fmt;

/// Words the lexer always reads as keywords, never as identifiers.
pub const KEYWORDS: [&str; 7] = ["SELECT", "FROM", "WHERE", "ORDER", "BY", "ASC", "DESC"];

/// Returns true when `word` is a keyword, ignoring case.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Select,
    From,
    Where,
    Order,
    By,
    Asc,
    Desc,

    // Literals and identifiers
    Identifier(String),
    String(String),

    // Delimiters
    Star,      // *
    Comma,     // ,
    Semicolon, // ;

    /// Any other single character. Only meaningful inside a predicate.
    Symbol(char),

    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Select => f.write_str("SELECT"),
            Token::From => f.write_str("FROM"),
            Token::Where => f.write_str("WHERE"),
            Token::Order => f.write_str("ORDER"),
            Token::By => f.write_str("BY"),
            Token::Asc => f.write_str("ASC"),
            Token::Desc => f.write_str("DESC"),
            Token::Identifier(name) => write!(f, "'{}'", name),
            Token::String(s) => write!(f, "string '{}'", s),
            Token::Star => f.write_str("'*'"),
            Token::Comma => f.write_str("','"),
            Token::Semicolon => f.write_str("';'"),
            Token::Symbol(c) => write!(f, "'{}'", c),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// A token with its byte range in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

pub struct SqlLexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    position: usize,
}

impl<'a> SqlLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.position).map(|&(_, c)| c)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).map(|&(_, c)| c)
    }

    /// Byte offset of the current character, or the source length at the end.
    fn offset(&self) -> usize {
        self.chars
            .get(self.position)
            .map(|&(i, _)| i)
            .unwrap_or(self.source.len())
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> Token {
        let start = self.offset();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let word = &self.source[start..self.offset()];

        match word.to_ascii_uppercase().as_str() {
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "ORDER" => Token::Order,
            "BY" => Token::By,
            "ASC" => Token::Asc,
            "DESC" => Token::Desc,
            _ => Token::Identifier(word.to_string()),
        }
    }

    /// Reads a single-quoted string; `''` is an escaped quote.
    ///
    /// A quote with no closing partner is a lone `Symbol('\'')`, so an
    /// apostrophe as in `O'Brien` stays ordinary predicate text.
    fn read_string(&mut self) -> Token {
        let opened_at = self.position;
        self.advance(); // opening quote

        let mut string = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '\'' {
                if self.peek() == Some('\'') {
                    string.push('\'');
                    self.advance();
                    self.advance();
                } else {
                    self.advance(); // closing quote
                    return Token::String(string);
                }
            } else {
                string.push(ch);
                self.advance();
            }
        }

        self.position = opened_at + 1;
        Token::Symbol('\'')
    }

    pub fn next_token(&mut self) -> ExecResult<Spanned> {
        self.skip_whitespace();
        let start = self.offset();

        let token = match self.current_char() {
            None => Token::Eof,
            Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => self.read_word(),
            Some('\'') => self.read_string(),
            Some(ch) => {
                self.advance();
                match ch {
                    '*' => Token::Star,
                    ',' => Token::Comma,
                    ';' => Token::Semicolon,
                    other => Token::Symbol(other),
                }
            }
        };

        Ok(Spanned {
            token,
            start,
            end: self.offset(),
        })
    }

    pub fn tokenize(&mut self) -> ExecResult<Vec<Spanned>> {
        let mut tokens = Vec::new();

        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }

        Ok(tokens)
    }
}
