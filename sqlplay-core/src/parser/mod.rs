//! Command classification and the recursive-descent `SELECT` parser.


use crate::ast::{OrderByItem, Projection, SelectStatement, StatementKind};
use crate::error::{ExecResult, QueryError};
use crate::lexer::{Spanned, SqlLexer, Token};

/// Collapse every whitespace run into a single space and trim the ends.
pub fn normalize(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Classify a normalized query by its leading keyword.
///
/// This is a prefix test, not a token test: `INSERT`, `UPDATE` and `DELETE`
/// are recognized even when glued to what follows, and anything starting with
/// `SELECT` is handed to the parser, which reports malformed text.
pub fn classify(normalized: &str) -> ExecResult<StatementKind> {
    const SIMULATED: [(&str, StatementKind); 3] = [
        ("INSERT", StatementKind::Insert),
        ("UPDATE", StatementKind::Update),
        ("DELETE", StatementKind::Delete),
    ];

    for (prefix, kind) in SIMULATED {
        if starts_with_ignore_case(normalized, prefix) {
            return Ok(kind);
        }
    }

    if starts_with_ignore_case(normalized, "SELECT") {
        return Ok(StatementKind::Select);
    }

    let leading = normalized.split(' ').next().unwrap_or_default();
    Err(QueryError::UnsupportedCommand(if leading.is_empty() {
        "empty query; only SELECT (or simulated INSERT/UPDATE/DELETE) is allowed".to_string()
    } else {
        format!(
            "'{}'; only SELECT (or simulated INSERT/UPDATE/DELETE) is allowed",
            leading
        )
    }))
}

/// Parse a single `SELECT` statement.
pub fn parse(input: &str) -> ExecResult<SelectStatement> {
    Parser::new(input)?.parse()
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Spanned>,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> ExecResult<Self> {
        let tokens = SqlLexer::new(source).tokenize()?;
        Ok(Self {
            source,
            tokens,
            position: 0,
        })
    }

    fn current(&self) -> &Spanned {
        // tokenize always ends with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn current_token(&self) -> &Token {
        &self.current().token
    }

    fn peek_token(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.position + offset)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn error(&self, expected: &str) -> QueryError {
        QueryError::SyntaxError(format!(
            "expected {}, found {}",
            expected,
            self.current_token()
        ))
    }

    fn expect(&mut self, expected: Token) -> ExecResult<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&expected.to_string()))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> ExecResult<String> {
        match self.current_token().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.error(what)),
        }
    }

    pub fn parse(&mut self) -> ExecResult<SelectStatement> {
        self.expect(Token::Select)?;
        let projection = self.parse_projection()?;

        self.expect(Token::From)?;
        let table = self.expect_identifier("table name")?;

        let predicate = if *self.current_token() == Token::Where {
            self.advance();
            Some(self.parse_predicate_clause()?)
        } else {
            None
        };

        let order_by = if *self.current_token() == Token::Order {
            self.advance();
            self.expect(Token::By)?;
            Some(self.parse_order_by()?)
        } else {
            None
        };

        if *self.current_token() == Token::Semicolon {
            self.advance();
        }

        if *self.current_token() != Token::Eof {
            let expected = match (&predicate, &order_by) {
                (_, Some(_)) => "end of query",
                (Some(_), None) => "ORDER BY or end of query",
                (None, None) => "WHERE, ORDER BY or end of query",
            };
            return Err(self.error(expected));
        }

        Ok(SelectStatement {
            projection,
            table,
            predicate,
            order_by,
        })
    }

    fn parse_projection(&mut self) -> ExecResult<Projection> {
        if *self.current_token() == Token::Star {
            self.advance();
            if *self.current_token() == Token::Comma {
                return Err(QueryError::SyntaxError(
                    "'*' cannot be combined with other columns".to_string(),
                ));
            }
            return Ok(Projection::All);
        }

        let mut columns = Vec::new();
        loop {
            columns.push(self.expect_identifier("column name or '*'")?);

            if *self.current_token() == Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        Ok(Projection::Columns(columns))
    }

    /// Everything up to `ORDER BY`, a trailing `;`, or the end of input is
    /// the predicate. Its text is kept verbatim.
    fn parse_predicate_clause(&mut self) -> ExecResult<String> {
        let start = self.current().start;

        loop {
            match self.current_token() {
                Token::Eof => break,
                Token::Order if *self.peek_token(1) == Token::By => break,
                Token::Semicolon if *self.peek_token(1) == Token::Eof => break,
                _ => self.advance(),
            }
        }

        let end = self.current().start;
        let clause = self.source[start..end].trim();
        if clause.is_empty() {
            return Err(self.error("a condition after WHERE"));
        }
        Ok(clause.to_string())
    }

    fn parse_order_by(&mut self) -> ExecResult<OrderByItem> {
        let column = self.expect_identifier("column name after ORDER BY")?;

        let descending = match self.current_token() {
            Token::Desc => {
                self.advance();
                true
            }
            Token::Asc => {
                self.advance();
                false
            }
            _ => false,
        };

        Ok(OrderByItem { column, descending })
    }
}
