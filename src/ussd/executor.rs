//! Executor: the dialog service's single entry into an engine.
//!
//! Both engines — the hand-built action tree and the pattern trie — sit
//! behind the [`Dispatch`] seam. The executor strips the session/service
//! code before dispatch: that prefix identifies the application at the
//! telco, it is not part of any menu. The prefix is configured as a dial
//! string (`*662*104#`) and stripped as however many tokens the shared
//! scanner grammar splits it into.

use std::sync::Arc;

use async_trait::async_trait;

use crate::ussd::action::ActionNode;
use crate::ussd::command::Command;
use crate::ussd::error::UssdError;
use crate::ussd::params::Params;
use crate::ussd::router::Mux;
use crate::ussd::token::scan;
use crate::ussd::DialogResult;

/// A menu engine: given a prefix-stripped command and a fresh parameter
/// bag, produce this round-trip's screen.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, cmd: &Command, params: &mut Params)
        -> Result<DialogResult, UssdError>;
}

#[async_trait]
impl Dispatch for Mux {
    async fn dispatch(
        &self,
        cmd: &Command,
        params: &mut Params,
    ) -> Result<DialogResult, UssdError> {
        self.process(cmd, params).await
    }
}

#[async_trait]
impl Dispatch for ActionNode {
    async fn dispatch(
        &self,
        cmd: &Command,
        params: &mut Params,
    ) -> Result<DialogResult, UssdError> {
        let result = self.run(cmd)?;
        params.set_leaf(result.leaf);
        Ok(result)
    }
}

pub struct Executor {
    engine: Arc<dyn Dispatch>,
    prefix_len: usize,
}

impl Executor {
    pub fn new(engine: Arc<dyn Dispatch>, prefix: &str) -> Executor {
        Executor {
            engine,
            prefix_len: scan(prefix).len(),
        }
    }

    pub async fn execute(
        &self,
        mut cmd: Command,
        params: &mut Params,
    ) -> Result<DialogResult, UssdError> {
        cmd.skip_front(self.prefix_len);
        self.engine.dispatch(&cmd, params).await
    }
}
