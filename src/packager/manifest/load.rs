//! Reads a generated `manifest.php` back into descriptor values.
//!
//! Accepts the subset of PHP that [`export`](super::export) produces: a
//! `<?php` tag followed by `$name = <expr>;` assignments, where `<expr>` is
//! `array (...)`, a single-quoted string, a number, `true`, `false`, `NULL`,
//! `NAN` or `INF`. Keywords are case-insensitive, as in PHP.
//!
//! An array whose keys are exactly `0..n` in order becomes a list; an array
//! with any string key becomes a map. `array ()` becomes an empty list.

use super::value::{DescriptorMap, DescriptorValue};
use crate::packager::error::{Error, Result};

/// Parses every `$name = value;` statement, in source order.
pub fn parse_assignments(source: &str) -> Result<Vec<(String, DescriptorValue)>> {
    let mut parser = Parser::new(source);
    parser.skip_ws();
    parser.expect_literal("<?php")?;

    let mut statements = Vec::new();
    loop {
        parser.skip_ws();
        if parser.at_end() {
            break;
        }
        parser.expect_char('$')?;
        let name = parser.identifier()?;
        parser.skip_ws();
        parser.expect_char('=')?;
        parser.skip_ws();
        let value = parser.value()?;
        parser.skip_ws();
        parser.expect_char(';')?;
        statements.push((name, value));
    }
    Ok(statements)
}

enum Key {
    Index(i64),
    Name(String),
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map_or(0, |tail| tail.chars().count())
            + 1;
        Error::ManifestParse {
            line,
            column,
            message: message.into(),
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn expect_literal(&mut self, literal: &str) -> Result<()> {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(self.error(format!("expected `{literal}`")))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        let matches = rest
            .get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
            && rest[keyword.len()..]
                .chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        if matches {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> Result<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        if self.pos == start {
            return Err(self.error("expected a variable name"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn value(&mut self) -> Result<DescriptorValue> {
        match self.peek() {
            Some('\'') => self.string().map(DescriptorValue::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(_) => {
                if self.eat_keyword("array") {
                    self.array()
                } else if self.eat_keyword("true") {
                    Ok(DescriptorValue::Bool(true))
                } else if self.eat_keyword("false") {
                    Ok(DescriptorValue::Bool(false))
                } else if self.eat_keyword("null") {
                    Ok(DescriptorValue::Null)
                } else if self.eat_keyword("nan") {
                    Ok(DescriptorValue::Float(f64::NAN))
                } else if self.eat_keyword("inf") {
                    Ok(DescriptorValue::Float(f64::INFINITY))
                } else {
                    Err(self.error("expected a value"))
                }
            }
            None => Err(self.error("expected a value, found end of input")),
        }
    }

    fn string(&mut self) -> Result<String> {
        self.expect_char('\'')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.peek() {
                    Some(c @ ('\\' | '\'')) => {
                        self.bump();
                        out.push(c);
                    }
                    _ => out.push('\\'),
                },
                Some('\'') => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn number(&mut self) -> Result<DescriptorValue> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
            if self.eat_keyword("inf") {
                return Ok(DescriptorValue::Float(f64::NEG_INFINITY));
            }
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        let text = &self.src[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(DescriptorValue::Float)
                .map_err(|e| self.error(format!("invalid float `{text}`: {e}")))
        } else {
            text.parse::<i64>()
                .map(DescriptorValue::Int)
                .map_err(|e| self.error(format!("invalid integer `{text}`: {e}")))
        }
    }

    fn key(&mut self) -> Result<Key> {
        match self.peek() {
            Some('\'') => self.string().map(Key::Name),
            _ => match self.number()? {
                DescriptorValue::Int(n) => Ok(Key::Index(n)),
                _ => Err(self.error("array keys must be strings or integers")),
            },
        }
    }

    fn array(&mut self) -> Result<DescriptorValue> {
        self.skip_ws();
        self.expect_char('(')?;

        let mut entries: Vec<(Key, DescriptorValue)> = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(')') {
                self.bump();
                break;
            }
            let key = self.key()?;
            self.skip_ws();
            self.expect_literal("=>")?;
            self.skip_ws();
            let value = self.value()?;
            entries.push((key, value));
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {}
                _ => return Err(self.error("expected ',' or ')'")),
            }
        }

        let sequential = entries
            .iter()
            .enumerate()
            .all(|(i, (key, _))| matches!(key, Key::Index(n) if usize::try_from(*n) == Ok(i)));

        if sequential {
            Ok(DescriptorValue::List(
                entries.into_iter().map(|(_, v)| v).collect(),
            ))
        } else {
            Ok(DescriptorValue::Map(
                entries
                    .into_iter()
                    .map(|(key, v)| match key {
                        Key::Index(n) => (n.to_string(), v),
                        Key::Name(name) => (name, v),
                    })
                    .collect::<DescriptorMap>(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(source: &str) -> DescriptorValue {
        let mut statements = parse_assignments(source).unwrap();
        assert_eq!(statements.len(), 1);
        statements.remove(0).1
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(single("<?php $a = 'x\\'y\\\\z\\n';"), "x'y\\z\\n".into());
        assert_eq!(single("<?php $a = -12;"), DescriptorValue::Int(-12));
        assert_eq!(single("<?php $a = 1.0E+25;"), DescriptorValue::Float(1.0e25));
        assert_eq!(single("<?php $a = TRUE;"), DescriptorValue::Bool(true));
        assert_eq!(single("<?php $a = NULL;"), DescriptorValue::Null);
        assert_eq!(
            single("<?php $a = -INF;"),
            DescriptorValue::Float(f64::NEG_INFINITY)
        );
    }

    #[test]
    fn parses_sequential_arrays_as_lists() {
        let value = single("<?php\n$a = array (\n  0 => 'a',\n  1 => 2,\n);\n");
        assert_eq!(value, DescriptorValue::List(vec!["a".into(), 2.into()]));
    }

    #[test]
    fn sparse_or_named_keys_become_maps() {
        let value = single("<?php $a = array ( 1 => 'a', 'k' => 'b' );");
        assert_eq!(
            value,
            DescriptorValue::Map(DescriptorMap::new().with("1", "a").with("k", "b"))
        );
    }

    #[test]
    fn reports_position_of_errors() {
        let err = parse_assignments("<?php\n$a = array (\n  'x' => ,\n);").unwrap_err();
        match err {
            Error::ManifestParse { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, 10);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_tag_and_unterminated_input() {
        assert!(parse_assignments("$a = 1;").is_err());
        assert!(parse_assignments("<?php $a = 'open;").is_err());
        assert!(parse_assignments("<?php $a = array ( 0 => 1").is_err());
    }
}
