//! Per-request command: the token stream plus the caller identity.
//!
//! Built fresh for every round-trip and never shared; the engines traverse
//! it read-only after the executor has stripped the service-code prefix.

use crate::ussd::token::{scan, Token};

#[derive(Debug, Clone)]
pub struct Command {
    tokens: Vec<Token>,
    /// The raw dial string as received from the gateway.
    pub request: String,
    /// Subscriber msisdn, available to leaf screens.
    pub phone: String,
}

impl Command {
    pub fn parse(input: &str, phone: &str) -> Command {
        Command {
            tokens: scan(input),
            request: input.to_string(),
            phone: phone.to_string(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Drops the first `count` tokens; dropping past the end leaves an empty
    /// command rather than failing, so a bare service-code dial still routes
    /// to the root menu.
    pub fn skip_front(&mut self, count: usize) {
        let count = count.min(self.tokens.len());
        self.tokens.drain(..count);
    }

    /// Re-joins the token values with `*`. Scanning the result yields the
    /// same token sequence.
    pub fn join(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.value.as_str())
            .collect::<Vec<_>>()
            .join("*")
    }
}
