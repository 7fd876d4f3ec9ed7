//! # Auth Gate
//!
//! An authed handler must never run unless the request carries a session
//! signed with the server's key. Every rejection looks the same on the wire.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chat_service::{GetChatHistoryRequest, GetChatHistoryResponse, UserSession};
use parking_lot::Mutex;
use svc_descriptor::AuthedServiceDescriptor;
use svc_handler::{ApiResult, AuthedHandler, LogContext};

pub static COUNTED_HISTORY: AuthedServiceDescriptor<GetChatHistoryRequest, GetChatHistoryResponse> =
    AuthedServiceDescriptor::new("CountedHistory", "/CountedHistory");

/// Authed handler that only counts its invocations.
#[derive(Default)]
pub struct CountingHandler {
    pub calls: Arc<AtomicUsize>,
    pub last_user: Arc<Mutex<Option<String>>>,
}

impl CountingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthedHandler for CountingHandler {
    type Request = GetChatHistoryRequest;
    type Response = GetChatHistoryResponse;
    type Session = UserSession;

    fn descriptor(
        &self,
    ) -> &'static AuthedServiceDescriptor<GetChatHistoryRequest, GetChatHistoryResponse> {
        &COUNTED_HISTORY
    }

    async fn handle(
        &self,
        _ctx: &LogContext,
        _request: GetChatHistoryRequest,
        session: UserSession,
    ) -> ApiResult<GetChatHistoryResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user.lock() = session.user_id;
        Ok(GetChatHistoryResponse::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use svc_handler::{HandlerRegistry, UNAUTHORIZED_MESSAGE};
    use svc_session::{SecretKey, SessionSigner};

    use crate::support::{post_json, test_signer, TestServer};

    struct Gate {
        server: TestServer,
        signer: Arc<SessionSigner>,
        calls: Arc<AtomicUsize>,
        last_user: Arc<Mutex<Option<String>>>,
    }

    async fn gate() -> Gate {
        let signer = test_signer();
        let handler = CountingHandler::default();
        let calls = Arc::clone(&handler.calls);
        let last_user = Arc::clone(&handler.last_user);

        let mut registry = HandlerRegistry::new(Arc::clone(&signer));
        registry.register_authed(handler).unwrap();

        Gate {
            server: TestServer::spawn(registry).await,
            signer,
            calls,
            last_user,
        }
    }

    fn token_for(signer: &SessionSigner, user_id: &str) -> String {
        signer
            .build_session(&UserSession {
                user_id: Some(user_id.to_string()),
            })
            .unwrap()
            .into_string()
    }

    #[tokio::test]
    async fn test_valid_session_reaches_handler() {
        let gate = gate().await;
        let token = token_for(&gate.signer, "user-1");

        let (status, _) = post_json(
            &gate.server.url("/CountedHistory"),
            &json!({"signedSession": token, "channelId": "c"}),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(gate.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.last_user.lock().as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_invalid_sessions_never_reach_handler() {
        let gate = gate().await;
        let genuine = token_for(&gate.signer, "user-1");
        let (payload, tag) = genuine.split_once('.').unwrap();

        let foreign = {
            let other = SessionSigner::new(&SecretKey::from_string("other key").unwrap()).unwrap();
            token_for(&other, "user-1")
        };
        let admin_payload = token_for(&gate.signer, "admin");
        let admin_payload = admin_payload.split_once('.').unwrap().0;

        let mut tampered_tag = tag.to_string().into_bytes();
        tampered_tag[0] = if tampered_tag[0] == b'A' { b'B' } else { b'A' };
        let tampered_tag = String::from_utf8(tampered_tag).unwrap();

        let bodies: Vec<Value> = vec![
            json!({}),
            json!({"channelId": "c"}),
            json!({"signedSession": null}),
            json!({"signedSession": 12345}),
            json!({"signedSession": ["a", "b"]}),
            json!({"signedSession": ""}),
            json!({"signedSession": "no-separator"}),
            json!({"signedSession": format!("{}.", payload)}),
            json!({"signedSession": format!(".{}", tag)}),
            json!({"signedSession": format!("{}.{}", payload, tampered_tag)}),
            json!({"signedSession": format!("{}.{}", admin_payload, tag)}),
            json!({"signedSession": foreign}),
            json!({"signedSession": "!!!.???"}),
        ];

        let mut rejection_bodies = Vec::new();
        for body in &bodies {
            let (status, response) = post_json(&gate.server.url("/CountedHistory"), body).await;
            assert_eq!(status, 401, "body {}", body);
            rejection_bodies.push(response);
        }

        assert_eq!(gate.calls.load(Ordering::SeqCst), 0);
        let expected = json!({"error": {"code": 401, "message": UNAUTHORIZED_MESSAGE}});
        assert!(rejection_bodies.iter().all(|b| *b == expected));
    }

    #[tokio::test]
    async fn test_chat_history_tampered_session_is_401() {
        let signer = test_signer();
        let server = TestServer::chat(Arc::clone(&signer)).await;
        let token = token_for(&signer, "a random id");
        let mut bytes = token.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'A' { b'Q' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let (status, _) = post_json(
            &server.url("/GetChatHistory"),
            &json!({"signedSession": tampered, "channelId": "my channel"}),
        )
        .await;
        assert_eq!(status, 401);

        let (status, _) = post_json(
            &server.url("/GetChatHistory"),
            &json!({"channelId": "my channel"}),
        )
        .await;
        assert_eq!(status, 401);

        server.stop().await;
    }
}
