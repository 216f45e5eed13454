//! USSD dialog engine.
//!
//! The gateway is stateless: every round-trip resends the subscriber's full
//! selection history as one dial string. This module re-derives "where in
//! the conversation we are" by replaying that string through a menu engine:
//!
//! dial string → [`token::scan`] → [`command::Command`] →
//! [`executor::Executor`] → tree/trie traversal → [`DialogResult`] →
//! [`service::DialogService`] → response envelope.

pub mod action;
pub mod command;
pub mod error;
pub mod executor;
pub mod params;
pub mod router;
pub mod screens;
pub mod service;
pub mod session;
pub mod token;

pub use error::UssdError;

/// One round-trip's output: the screen text and whether the session ends
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogResult {
    pub text: String,
    pub leaf: bool,
}
