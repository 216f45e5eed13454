//! Dialog service: envelope in, envelope out.
//!
//! Validates the inbound session, tokenizes the dial string, drives the
//! executor and maps the engine's result into the gateway response. Engine
//! and collaborator failures become an in-session message: a USSD session
//! must never crash visibly, and a closed session cannot be resumed.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::identity::RefProvider;
use crate::ussd::command::Command;
use crate::ussd::error::UssdError;
use crate::ussd::executor::Executor;
use crate::ussd::params::Params;
use crate::ussd::session::{SessionRequest, SessionResponse};
use crate::ussd::DialogResult;

/// Shown when traversal or a collaborator failed and no screen produced a
/// friendlier message.
const RETRY_TEXT: &str = "Something went wrong, please try again shortly";

pub struct DialogService {
    executor: Executor,
    refs: Arc<dyn RefProvider>,
}

impl DialogService {
    pub fn new(executor: Executor, refs: Arc<dyn RefProvider>) -> DialogService {
        DialogService { executor, refs }
    }

    /// One USSD round-trip. The only error this returns is an invalid
    /// envelope; everything downstream is folded into the response text.
    pub async fn process(&self, req: &SessionRequest) -> Result<SessionResponse, UssdError> {
        req.validate()?;

        let cmd = Command::parse(&req.user_input, &req.msisdn);
        let mut params = Params::new();

        let result = match self.executor.execute(cmd, &mut params).await {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    session = %req.session_id,
                    input = %req.user_input,
                    error = %err,
                    "dialog engine error, substituting retry screen"
                );
                DialogResult {
                    text: RETRY_TEXT.to_string(),
                    leaf: true,
                }
            }
        };

        debug!(
            session = %req.session_id,
            input = %req.user_input,
            msisdn = %req.msisdn,
            leaf = result.leaf,
            "dispatched ussd command"
        );

        Ok(SessionResponse {
            session_id: req.session_id.clone(),
            gw_ref: req.gw_ref.clone(),
            app_ref: self.refs.next_ref(),
            gw_tstamp: Utc::now(),
            text: result.text,
            end: if result.leaf { 0 } else { 1 },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ussd::action::ActionNode;
    use crate::ussd::executor::Executor;

    struct FixedRef;

    impl RefProvider for FixedRef {
        fn next_ref(&self) -> String {
            "app-ref-1".to_string()
        }
    }

    fn request(input: &str) -> SessionRequest {
        SessionRequest {
            session_id: "session".into(),
            service_code: "*662*104#".into(),
            network_code: "63510".into(),
            gw_ref: "gw-1".into(),
            msisdn: "250788123456".into(),
            gw_tstamp: "20260830120000".into(),
            user_input: input.into(),
            service_id: "svc".into(),
            tenant_id: "kigali".into(),
        }
    }

    fn service() -> DialogService {
        let mut root = ActionNode::root(|_| "main menu".to_string());
        root.child(1, |_| "goodbye".to_string());
        let executor = Executor::new(Arc::new(root), "*662*104#");
        DialogService::new(executor, Arc::new(FixedRef))
    }

    #[tokio::test]
    async fn continuation_screen_keeps_the_session_open() {
        let res = service().process(&request("*662*104#")).await.unwrap();
        assert_eq!(res.text, "main menu");
        assert_eq!(res.end, 1);
        assert_eq!(res.app_ref, "app-ref-1");
        assert_eq!(res.session_id, "session");
        assert_eq!(res.gw_ref, "gw-1");
    }

    #[tokio::test]
    async fn terminal_screen_closes_the_session() {
        let res = service().process(&request("*662*104*1#")).await.unwrap();
        assert_eq!(res.text, "goodbye");
        assert_eq!(res.end, 0);
    }

    #[tokio::test]
    async fn engine_error_becomes_a_retry_screen() {
        let res = service().process(&request("*662*104*7#")).await.unwrap();
        assert_eq!(res.text, RETRY_TEXT);
        assert_eq!(res.end, 0);
    }

    #[tokio::test]
    async fn invalid_envelope_is_rejected_before_tokenization() {
        let mut req = request("*662*104#");
        req.session_id.clear();
        let err = service().process(&req).await.unwrap_err();
        assert!(matches!(err, UssdError::InvalidEnvelope("sessionId")));
    }
}
