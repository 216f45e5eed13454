//! Dial-string lexer.
//!
//! A USSD gateway resends the subscriber's entire selection history on every
//! round-trip as one `*`-delimited string (`*662*104*1*KG123#`). This module
//! splits that string into ordered tokens and classifies each segment as a
//! menu instruction or a free-form variable.

use std::fmt;

/// Segments up to this length are menu keys; anything longer is data.
///
/// Kept at the historical value: raising it would reclassify short free-form
/// entries, lowering it would break 2- and 3-digit menu keys already in the
/// field.
const INSTRUCTION_MAX_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Instruction,
    Variable,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Instruction => write!(f, "Instruction"),
            TokenKind::Variable => write!(f, "Variable"),
        }
    }
}

/// One parsed dial segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn instruction(value: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Instruction,
            value: value.into(),
        }
    }

    pub fn variable(value: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Variable,
            value: value.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.kind, self.value)
    }
}

/// Splits a raw dial string into ordered tokens.
///
/// Trims a trailing `#`, splits on `*`, drops empty segments (leading or
/// doubled `*`). Token order equals dial order and no non-empty segment is
/// ever dropped. An empty input yields zero tokens, which is valid: it is
/// how a fresh session arrives.
pub fn scan(dial: &str) -> Vec<Token> {
    dial.trim_end_matches('#')
        .split('*')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.len() <= INSTRUCTION_MAX_LEN {
                Token::instruction(segment)
            } else {
                Token::variable(segment)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_length() {
        let tokens = scan("*662*104*1*KG123456#");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Instruction,
                TokenKind::Instruction,
                TokenKind::Instruction,
                TokenKind::Variable,
            ]
        );
        assert_eq!(tokens[3].value, "KG123456");
    }

    #[test]
    fn boundary_lengths() {
        assert_eq!(scan("*123#")[0].kind, TokenKind::Instruction);
        assert_eq!(scan("*1234#")[0].kind, TokenKind::Variable);
    }

    #[test]
    fn drops_empty_segments() {
        let tokens = scan("**662**104#");
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["662", "104"]);
    }

    #[test]
    fn empty_input_is_a_session_start() {
        assert!(scan("").is_empty());
        assert!(scan("#").is_empty());
        assert!(scan("*#").is_empty());
    }

    #[test]
    fn rejoin_is_idempotent() {
        for dial in ["*662*104#", "*662*104*1*KG123456*1#", "*1*0788123456#"] {
            let first = scan(dial);
            let joined = first
                .iter()
                .map(|t| t.value.as_str())
                .collect::<Vec<_>>()
                .join("*");
            assert_eq!(scan(&joined), first, "dial {dial}");
        }
    }
}
