//! `WHERE` clause interpretation.
//!
//! A clause is one `column <op> literal` triple. The operator is found by a
//! plain substring scan in a fixed priority order, so `NAME = 'a<b'` is an
//! equality test and `X < 'a=b'` is one too.

use crate::dataset::canonical;
use crate::value::{parse_number, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Gt,
    Lt,
    Like,
}

impl ComparisonOp {
    /// Detection order; the first operator present anywhere in the clause wins.
    pub const PRIORITY: [ComparisonOp; 4] = [
        ComparisonOp::Eq,
        ComparisonOp::Gt,
        ComparisonOp::Lt,
        ComparisonOp::Like,
    ];

    /// Lower-case text searched for in the clause.
    fn needle(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Like => "like",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Like => "LIKE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Canonical column name; empty when nothing precedes the operator.
    pub column: String,
    pub op: ComparisonOp,
    /// Literal with single quotes removed, trimmed.
    pub literal: String,
}

impl Predicate {
    /// Interpret a raw `WHERE` clause. `None` means no operator was found.
    ///
    /// The column is the text before the first occurrence of the operator and
    /// the literal is the text up to the next occurrence, so `A = B = C`
    /// compares `A` with `B`.
    pub fn parse(clause: &str) -> Option<Predicate> {
        let cleaned = clause.replace('\'', "");
        // ASCII lowering keeps byte offsets valid for slicing `cleaned`
        let lowered = cleaned.to_ascii_lowercase();

        ComparisonOp::PRIORITY.iter().find_map(|&op| {
            let needle = op.needle();
            let idx = lowered.find(needle)?;
            let rest = idx + needle.len();
            let end = lowered[rest..].find(needle).map_or(lowered.len(), |i| rest + i);
            Some(Predicate {
                column: canonical(&cleaned[..idx]),
                op,
                literal: cleaned[rest..end].trim().to_string(),
            })
        })
    }

    /// Test one cell against the predicate.
    ///
    /// Comparisons are numeric when both sides read as numbers, otherwise they
    /// work on the display text. `LIKE` is always a case-insensitive prefix
    /// test with every `%` removed from the literal.
    pub fn matches(&self, value: &Value) -> bool {
        if self.op == ComparisonOp::Like {
            let prefix = self.literal.replace('%', "").to_lowercase();
            return value.to_string().to_lowercase().starts_with(&prefix);
        }

        if let (Some(left), Some(right)) = (value.as_number(), parse_number(&self.literal)) {
            return match self.op {
                ComparisonOp::Eq => left == right,
                ComparisonOp::Gt => left > right,
                ComparisonOp::Lt => left < right,
                ComparisonOp::Like => unreachable!("handled above"),
            };
        }

        let text = value.to_string();
        match self.op {
            ComparisonOp::Eq => text.to_lowercase() == self.literal.to_lowercase(),
            ComparisonOp::Gt => text.as_str() > self.literal.as_str(),
            ComparisonOp::Lt => text.as_str() < self.literal.as_str(),
            ComparisonOp::Like => unreachable!("handled above"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicate(clause: &str) -> Predicate {
        Predicate::parse(clause).unwrap()
    }

    #[test]
    fn test_parse_operators() {
        let p = predicate("POP > 300000000");
        assert_eq!((p.column.as_str(), p.op, p.literal.as_str()), ("POP", ComparisonOp::Gt, "300000000"));

        let p = predicate("country like 'U%'");
        assert_eq!((p.column.as_str(), p.op, p.literal.as_str()), ("COUNTRY", ComparisonOp::Like, "U%"));

        let p = predicate("id<3");
        assert_eq!((p.column.as_str(), p.op, p.literal.as_str()), ("ID", ComparisonOp::Lt, "3"));
    }

    #[test]
    fn test_equals_wins_over_other_operators() {
        // '=' is checked first even though '>' appears earlier in the text
        let p = predicate("POP > = 5");
        assert_eq!(p.op, ComparisonOp::Eq);
        assert_eq!(p.column, "POP >");
        assert_eq!(p.literal, "5");

        let p = predicate("NAME LIKE 'a=b'");
        assert_eq!(p.op, ComparisonOp::Eq);
        assert_eq!(p.column, "NAME LIKE A");
        assert_eq!(p.literal, "b");
    }

    #[test]
    fn test_split_on_first_occurrence() {
        let p = predicate("A = B = C");
        assert_eq!(p.column, "A");
        assert_eq!(p.literal, "B");

        let p = predicate("NAME LIKE 'Alike%'");
        assert_eq!(p.column, "NAME");
        assert_eq!(p.literal, "A");
        assert!(p.matches(&Value::from("Ada Lovelace")));
    }

    #[test]
    fn test_no_operator() {
        assert_eq!(Predicate::parse("COUNTRY IS NULL"), None);
        assert_eq!(Predicate::parse("ID != 3").map(|p| p.op), Some(ComparisonOp::Eq));
    }

    #[test]
    fn test_empty_column_side() {
        let p = predicate("= 5");
        assert_eq!(p.column, "");
    }

    #[test]
    fn test_numeric_comparison() {
        let p = predicate("POP > 300000000");
        assert!(p.matches(&Value::Number(331000000.0)));
        assert!(!p.matches(&Value::Number(212000000.0)));

        let p = predicate("ID = 2.0");
        assert!(p.matches(&Value::Number(2.0)));

        // text cells holding numbers still compare numerically
        let p = predicate("CODE < 10");
        assert!(p.matches(&Value::from("9")));
    }

    #[test]
    fn test_string_comparison() {
        let p = predicate("COUNTRY = 'usa'");
        assert!(p.matches(&Value::from("USA")));
        assert!(!p.matches(&Value::from("UK")));

        // ordering comparisons are case-sensitive
        let p = predicate("NAME > 'B'");
        assert!(p.matches(&Value::from("Grace Hopper")));
        assert!(!p.matches(&Value::from("Ada Lovelace")));
        assert!(p.matches(&Value::from("alan")));

        // a non-numeric literal compares the number's text
        let p = predicate("ID = one");
        assert!(!p.matches(&Value::Number(1.0)));
        let p = predicate("ID > 0a");
        assert!(p.matches(&Value::Number(1.0)));
    }

    #[test]
    fn test_like_is_prefix_only() {
        let p = predicate("COUNTRY LIKE 'u%'");
        assert!(p.matches(&Value::from("UK")));
        assert!(p.matches(&Value::from("USA")));
        assert!(!p.matches(&Value::from("Brazil")));

        let p = predicate("NAME LIKE '%Turing'");
        assert!(!p.matches(&Value::from("Alan Turing")));

        let p = predicate("ID LIKE 1");
        assert!(p.matches(&Value::Number(1.0)));
    }

    #[test]
    fn test_empty_literal_is_not_numeric() {
        let p = predicate("ID =");
        assert_eq!(p.literal, "");
        assert!(!p.matches(&Value::Number(0.0)));
        assert!(p.matches(&Value::from("")));
    }
}
