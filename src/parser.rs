// In: src/parser.rs

//! The textual literal parser for integer maps and integer arrays.
//!
//! Map literals are comma-separated `key => value` pairs with arbitrary
//! whitespace (`"1=>10, 3=>30"`); the empty string is the empty map. Array
//! literals are brace-delimited comma-separated values (`"{1,2,3}"`, `"{}"`).
//! Integers follow the C `strtol` base-0 rules: optional sign, `0x`/`0X` for
//! hexadecimal, a leading `0` for octal, decimal otherwise.
//!
//! Failures carry their kind: malformed integer, integer out of range,
//! unexpected token, or unterminated literal.

use crate::error::IntMapError;

//==================================================================================
// 1. Public API
//==================================================================================

/// Parses a map literal into parallel key and value vectors, in input order.
pub fn parse_map_literal(text: &str) -> Result<(Vec<i64>, Vec<i64>), IntMapError> {
    // Mirrors the four-state loop of the original parser: key, '=>' delimiter,
    // value, ',' delimiter.
    enum State {
        Key,
        KvDelim,
        Value,
        Delim,
    }

    let mut cursor = TextCursor::new(text);
    let mut keys = Vec::new();
    let mut values = Vec::new();
    let mut state = State::Key;

    loop {
        cursor.skip_whitespace();
        if cursor.at_end() {
            break;
        }
        match state {
            State::Key => {
                keys.push(cursor.parse_int()?);
                state = State::KvDelim;
            }
            State::KvDelim => {
                if !cursor.eat(b"=>") {
                    return Err(IntMapError::UnexpectedToken {
                        expected: "'=>'",
                        found: cursor.snippet(),
                    });
                }
                state = State::Value;
            }
            State::Value => {
                values.push(cursor.parse_int()?);
                state = State::Delim;
            }
            State::Delim => {
                if !cursor.eat(b",") {
                    return Err(IntMapError::UnexpectedToken {
                        expected: "','",
                        found: cursor.snippet(),
                    });
                }
                state = State::Key;
            }
        }
    }

    match state {
        State::Delim => Ok((keys, values)),
        // Nothing but whitespace parses as the empty map.
        State::Key if keys.is_empty() => Ok((keys, values)),
        _ => Err(IntMapError::UnterminatedLiteral(
            "expected a complete 'key => value' pair".into(),
        )),
    }
}

/// Parses an array literal (`{v, v, ...}` or `{}`) into a vector.
pub fn parse_array_literal(text: &str) -> Result<Vec<i64>, IntMapError> {
    let mut cursor = TextCursor::new(text);
    let mut values = Vec::new();

    cursor.skip_whitespace();
    if !cursor.eat(b"{") {
        return Err(IntMapError::UnexpectedToken {
            expected: "'{'",
            found: cursor.snippet(),
        });
    }

    cursor.skip_whitespace();
    if !cursor.eat(b"}") {
        loop {
            cursor.skip_whitespace();
            values.push(cursor.parse_int()?);
            cursor.skip_whitespace();
            if cursor.eat(b",") {
                continue;
            }
            if cursor.eat(b"}") {
                break;
            }
            if cursor.at_end() {
                return Err(IntMapError::UnterminatedLiteral(
                    "missing closing '}'".into(),
                ));
            }
            return Err(IntMapError::UnexpectedToken {
                expected: "',' or '}'",
                found: cursor.snippet(),
            });
        }
    }

    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(IntMapError::UnexpectedToken {
            expected: "end of input",
            found: cursor.snippet(),
        });
    }
    Ok(values)
}

//==================================================================================
// 2. Cursor
//==================================================================================

/// A byte cursor over the literal text with bounds-checked advances.
struct TextCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TextCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consumes `token` if the input continues with it.
    fn eat(&mut self, token: &[u8]) -> bool {
        if self.bytes[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// A short excerpt of the remaining input, for error messages.
    fn snippet(&self) -> String {
        let rest = &self.bytes[self.pos.min(self.bytes.len())..];
        let take = rest.len().min(16);
        String::from_utf8_lossy(&rest[..take]).into_owned()
    }

    /// Parses one integer literal with `strtol` base-0 semantics.
    fn parse_int(&mut self) -> Result<i64, IntMapError> {
        let start = self.pos;

        let negative = match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let radix: u64 = if self.eat(b"0x") || self.eat(b"0X") {
            16
        } else if self.peek() == Some(b'0') {
            // A leading zero selects octal; a bare "0" is just zero.
            8
        } else {
            10
        };

        let mut magnitude: u64 = 0;
        let mut digits = 0usize;
        while let Some(b) = self.peek() {
            let digit = match (b, radix) {
                (b'0'..=b'7', 8) => u64::from(b - b'0'),
                (b'0'..=b'9', 10 | 16) => u64::from(b - b'0'),
                (b'a'..=b'f', 16) => u64::from(b - b'a') + 10,
                (b'A'..=b'F', 16) => u64::from(b - b'A') + 10,
                _ => break,
            };
            magnitude = magnitude
                .checked_mul(radix)
                .and_then(|m| m.checked_add(digit))
                .ok_or_else(|| IntMapError::IntegerOutOfRange(self.token_text(start)))?;
            digits += 1;
            self.pos += 1;
        }

        if digits == 0 {
            return Err(IntMapError::MalformedInteger(self.snippet()));
        }

        let limit = if negative {
            1u64 << 63
        } else {
            i64::MAX as u64
        };
        if magnitude > limit {
            return Err(IntMapError::IntegerOutOfRange(self.token_text(start)));
        }
        Ok(if negative {
            (magnitude as i64).wrapping_neg()
        } else {
            magnitude as i64
        })
    }

    fn token_text(&self, start: usize) -> String {
        // Include any digits not yet consumed so the message shows the whole
        // offending token.
        let mut end = self.pos;
        while matches!(self.bytes.get(end), Some(b) if b.is_ascii_alphanumeric()) {
            end += 1;
        }
        String::from_utf8_lossy(&self.bytes[start..end]).into_owned()
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_map() {
        let (keys, values) = parse_map_literal("1=>10, 5=>50, 3=>30").unwrap();
        assert_eq!(keys, vec![1, 5, 3]);
        assert_eq!(values, vec![10, 50, 30]);
    }

    #[test]
    fn test_parse_map_with_loose_whitespace() {
        let (keys, values) = parse_map_literal("  -1 =>  2 ,3=>-4  ").unwrap();
        assert_eq!(keys, vec![-1, 3]);
        assert_eq!(values, vec![2, -4]);
    }

    #[test]
    fn test_empty_map_literal() {
        assert_eq!(parse_map_literal("").unwrap(), (vec![], vec![]));
        assert_eq!(parse_map_literal("   ").unwrap(), (vec![], vec![]));
    }

    #[test]
    fn test_integer_bases() {
        let (keys, values) = parse_map_literal("0x1F=>017, 0=>-0x10").unwrap();
        assert_eq!(keys, vec![31, 0]);
        assert_eq!(values, vec![15, -16]);
    }

    #[test]
    fn test_boundary_integers() {
        let (keys, values) =
            parse_map_literal("-9223372036854775808=>9223372036854775807").unwrap();
        assert_eq!(keys, vec![i64::MIN]);
        assert_eq!(values, vec![i64::MAX]);
    }

    #[test]
    fn test_out_of_range_integer() {
        let result = parse_map_literal("9223372036854775808=>1");
        assert!(matches!(result, Err(IntMapError::IntegerOutOfRange(_))));

        let result = parse_map_literal("1=>-9223372036854775809");
        assert!(matches!(result, Err(IntMapError::IntegerOutOfRange(_))));
    }

    #[test]
    fn test_malformed_integer() {
        let result = parse_map_literal("a=>1");
        assert!(matches!(result, Err(IntMapError::MalformedInteger(_))));
    }

    #[test]
    fn test_missing_pair_delimiter() {
        let result = parse_map_literal("1 10");
        assert!(matches!(result, Err(IntMapError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_unterminated_map() {
        for text in ["1", "1=>", "1=>2,"] {
            let result = parse_map_literal(text);
            assert!(
                matches!(result, Err(IntMapError::UnterminatedLiteral(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_parse_simple_array() {
        assert_eq!(parse_array_literal("{1,2,3}").unwrap(), vec![1, 2, 3]);
        assert_eq!(
            parse_array_literal(" { -1 , 0x20 , 07 } ").unwrap(),
            vec![-1, 32, 7]
        );
    }

    #[test]
    fn test_empty_array_literal() {
        assert_eq!(parse_array_literal("{}").unwrap(), Vec::<i64>::new());
        assert_eq!(parse_array_literal("  {  }  ").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_array_errors() {
        assert!(matches!(
            parse_array_literal("1,2,3"),
            Err(IntMapError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_array_literal("{1,2"),
            Err(IntMapError::UnterminatedLiteral(_))
        ));
        assert!(matches!(
            parse_array_literal("{1;2}"),
            Err(IntMapError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_array_literal("{1,2} extra"),
            Err(IntMapError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_array_literal("{,}"),
            Err(IntMapError::MalformedInteger(_))
        ));
    }
}
