//! # Chat Flow
//!
//! SignIn issues a signed session; GetChatHistory accepts it. Both go through
//! the typed [`ServiceClient`](svc_client::ServiceClient) against a loopback
//! server.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chat_service::{
        ChatEntry, GetChatHistoryRequest, SignInRequest, UserSession, GET_CHAT_HISTORY, SIGN_IN,
    };
    use svc_client::{
        ClientError, FileSessionStorage, InMemorySessionStorage, ServiceClient, SessionStorage,
    };

    use crate::support::{test_signer, TestServer};

    fn sign_in_request(password: &str) -> SignInRequest {
        SignInRequest {
            email: Some("me@email.com".to_string()),
            password: Some(password.to_string()),
        }
    }

    fn history_request() -> GetChatHistoryRequest {
        GetChatHistoryRequest {
            channel_id: Some("my channel".to_string()),
            ..Default::default()
        }
    }

    // =========================================================================
    // SIGN IN
    // =========================================================================

    #[tokio::test]
    async fn test_sign_in_correct_password_issues_session() {
        let signer = test_signer();
        let server = TestServer::chat(Arc::clone(&signer)).await;
        let client = ServiceClient::new(&server.origin, InMemorySessionStorage::new()).unwrap();

        let response = client
            .fetch_unauthed(&sign_in_request("correct password"), &SIGN_IN)
            .await
            .unwrap();

        let token = response.signed_session.unwrap();
        assert!(!token.is_empty());
        let session: UserSession = signer.verify_session(&token).unwrap();
        assert_eq!(session.user_id.as_deref(), Some("a random id"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_issues_nothing() {
        let server = TestServer::chat(test_signer()).await;
        let client = ServiceClient::new(&server.origin, InMemorySessionStorage::new()).unwrap();

        let response = client
            .fetch_unauthed(&sign_in_request("12345"), &SIGN_IN)
            .await
            .unwrap();
        assert_eq!(response.signed_session, None);

        server.stop().await;
    }

    // =========================================================================
    // CHAT HISTORY
    // =========================================================================

    #[tokio::test]
    async fn test_history_with_valid_session() {
        let server = TestServer::chat(test_signer()).await;
        let client = ServiceClient::new(&server.origin, InMemorySessionStorage::new()).unwrap();

        let signed_in = client
            .fetch_unauthed(&sign_in_request("correct password"), &SIGN_IN)
            .await
            .unwrap();
        client
            .save_session(&signed_in.signed_session.unwrap())
            .unwrap();

        let history = client
            .fetch_authed(&history_request(), &GET_CHAT_HISTORY)
            .await
            .unwrap();

        assert_eq!(
            history.chat_entries.unwrap(),
            vec![ChatEntry {
                content: Some("something".to_string()),
                timestamp: Some(1234567),
            }]
        );

        server.stop().await;
    }

    #[tokio::test]
    async fn test_history_without_session_is_unauthenticated() {
        let server = TestServer::chat(test_signer()).await;
        let client = ServiceClient::new(&server.origin, InMemorySessionStorage::new()).unwrap();

        let err = client
            .fetch_authed(&history_request(), &GET_CHAT_HISTORY)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_rejected_session_is_cleared() {
        let server = TestServer::chat(test_signer()).await;
        let storage = Arc::new(InMemorySessionStorage::new());
        let client = ServiceClient::new(&server.origin, Arc::clone(&storage)).unwrap();

        // Signed by a different deployment.
        let foreign = {
            let key = svc_session::SecretKey::from_string("another secret").unwrap();
            let signer = svc_session::SessionSigner::new(&key).unwrap();
            signer
                .build_session(&UserSession {
                    user_id: Some("a random id".to_string()),
                })
                .unwrap()
        };
        client.save_session(foreign.as_str()).unwrap();

        let err = client
            .fetch_authed(&history_request(), &GET_CHAT_HISTORY)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(storage.load().unwrap(), None);

        let err = client
            .fetch_authed(&history_request(), &GET_CHAT_HISTORY)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_session_file_reused_across_clients() {
        let server = TestServer::chat(test_signer()).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");

        let first = ServiceClient::new(&server.origin, FileSessionStorage::new(&path)).unwrap();
        let signed_in = first
            .fetch_unauthed(&sign_in_request("correct password"), &SIGN_IN)
            .await
            .unwrap();
        first
            .save_session(&signed_in.signed_session.unwrap())
            .unwrap();

        let second = ServiceClient::new(&server.origin, FileSessionStorage::new(&path)).unwrap();
        let history = second
            .fetch_authed(&history_request(), &GET_CHAT_HISTORY)
            .await
            .unwrap();
        assert_eq!(history.chat_entries.map(|e| e.len()), Some(1));

        server.stop().await;
    }
}
