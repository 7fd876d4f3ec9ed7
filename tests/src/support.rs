//! Loopback server harness.

use std::sync::Arc;

use chat_service::build_registry;
use svc_handler::{HandlerRegistry, ServerConfig, ServerError, ServiceServer};
use svc_session::{SecretKey, SessionSigner};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const TEST_SECRET: &str = "your secret key";

pub fn test_signer() -> Arc<SessionSigner> {
    let key = SecretKey::from_string(TEST_SECRET).unwrap();
    Arc::new(SessionSigner::new(&key).unwrap())
}

/// A service server on an ephemeral loopback port.
pub struct TestServer {
    pub origin: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub async fn spawn(registry: HandlerRegistry) -> Self {
        Self::spawn_with(ServerConfig::default(), registry).await
    }

    pub async fn spawn_with(config: ServerConfig, registry: HandlerRegistry) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let server = ServiceServer::new(config, registry).unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        Self {
            origin,
            shutdown: Some(tx),
            handle,
        }
    }

    /// Chat services signed with `signer`.
    pub async fn chat(signer: Arc<SessionSigner>) -> Self {
        Self::spawn(build_registry(signer).unwrap()).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.handle).await.unwrap().unwrap();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Raw JSON POST returning status and parsed body.
pub async fn post_json(url: &str, body: &serde_json::Value) -> (u16, serde_json::Value) {
    let response = reqwest::Client::new()
        .post(url)
        .json(body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let text = response.text().await.unwrap();
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
    (status, body)
}
