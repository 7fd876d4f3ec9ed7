//! # Dispatch
//!
//! Registration faults, routing outcomes and fault isolation as seen over
//! HTTP.

use async_trait::async_trait;
use chat_service::{SignInRequest, SignInResponse};
use svc_descriptor::UnauthedServiceDescriptor;
use svc_handler::{ApiError, ApiResult, LogContext, UnauthedHandler};

pub static FLAKY: UnauthedServiceDescriptor<SignInRequest, SignInResponse> =
    UnauthedServiceDescriptor::new("Flaky", "/Flaky");

/// Fails in the way named by the request email.
pub struct FlakyHandler;

#[async_trait]
impl UnauthedHandler for FlakyHandler {
    type Request = SignInRequest;
    type Response = SignInResponse;

    fn descriptor(&self) -> &'static UnauthedServiceDescriptor<SignInRequest, SignInResponse> {
        &FLAKY
    }

    async fn handle(&self, _ctx: &LogContext, request: SignInRequest) -> ApiResult<SignInResponse> {
        match request.email.as_deref() {
            Some("panic") => panic!("flaky handler lost its connection to 10.1.2.3"),
            Some("internal") => Err(ApiError::internal("db password rejected for admin")),
            Some("invalid") => Err(ApiError::bad_request("email is not allowed")),
            _ => Ok(SignInResponse::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chat_service::{build_registry, SignInHandler};
    use serde_json::json;
    use svc_handler::{HandlerRegistry, RegistryError, ServerConfig, INTERNAL_ERROR_MESSAGE};

    use crate::support::{post_json, test_signer, TestServer};

    async fn flaky_server() -> TestServer {
        let mut registry = build_registry(test_signer()).unwrap();
        registry.register_unauthed(FlakyHandler).unwrap();
        TestServer::spawn(registry).await
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    #[test]
    fn test_duplicate_path_is_startup_fault() {
        let signer = test_signer();
        let mut registry = HandlerRegistry::new(Arc::clone(&signer));
        registry
            .register_unauthed(SignInHandler::new(Arc::clone(&signer)))
            .unwrap();

        let err = registry
            .register_unauthed(SignInHandler::new(signer))
            .err()
            .unwrap();
        assert_eq!(
            err,
            RegistryError::DuplicatePath {
                path: "/SignIn",
                existing: "SignIn",
            }
        );
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    #[tokio::test]
    async fn test_unknown_path_404() {
        let server = TestServer::chat(test_signer()).await;
        let (status, body) = post_json(&server.url("/SignOut"), &json!({})).await;
        assert_eq!(status, 404);
        assert_eq!(body["error"]["code"], 404);

        // Paths match exactly.
        let (status, _) = post_json(&server.url("/signin"), &json!({})).await;
        assert_eq!(status, 404);
        server.stop().await;
    }

    #[tokio::test]
    async fn test_get_on_service_path_405() {
        let server = TestServer::chat(test_signer()).await;
        let response = reqwest::get(server.url("/SignIn")).await.unwrap();
        assert_eq!(response.status().as_u16(), 405);
        assert_eq!(response.headers()["allow"], "POST");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_non_object_body_400() {
        let server = TestServer::chat(test_signer()).await;
        let (status, body) = post_json(&server.url("/SignIn"), &json!(["x"])).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], 400);
        server.stop().await;
    }

    #[tokio::test]
    async fn test_health() {
        let server = TestServer::chat(test_signer()).await;
        let body: serde_json::Value = reqwest::get(server.url("/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["services"], 2);
        server.stop().await;
    }

    // =========================================================================
    // FAULT ISOLATION
    // =========================================================================

    #[tokio::test]
    async fn test_handler_panic_is_generic_500() {
        let server = flaky_server().await;

        let (status, body) = post_json(&server.url("/Flaky"), &json!({"email": "panic"})).await;
        assert_eq!(status, 500);
        assert_eq!(
            body,
            json!({"error": {"code": 500, "message": INTERNAL_ERROR_MESSAGE}})
        );

        // The server keeps serving other calls.
        let (status, _) = post_json(&server.url("/Flaky"), &json!({"email": "ok"})).await;
        assert_eq!(status, 200);
        server.stop().await;
    }

    #[tokio::test]
    async fn test_internal_error_detail_hidden() {
        let server = flaky_server().await;
        let (status, body) =
            post_json(&server.url("/Flaky"), &json!({"email": "internal"})).await;
        assert_eq!(status, 500);
        assert!(!body.to_string().contains("db password"));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_handler_client_error_passes_through() {
        let server = flaky_server().await;
        let (status, body) = post_json(&server.url("/Flaky"), &json!({"email": "invalid"})).await;
        assert_eq!(status, 400);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("email is not allowed"));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_metrics_count_outcomes() {
        let server = flaky_server().await;
        post_json(&server.url("/Flaky"), &json!({})).await;
        post_json(&server.url("/Flaky"), &json!({"email": "panic"})).await;
        post_json(&server.url("/Nowhere"), &json!({})).await;

        let metrics: serde_json::Value = reqwest::get(server.url("/metrics"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(metrics["requests"]["success"], 1);
        assert_eq!(metrics["errors"]["internal"], 1);
        assert_eq!(metrics["errors"]["not_found"], 1);
        server.stop().await;
    }

    // =========================================================================
    // CORS
    // =========================================================================

    #[tokio::test]
    async fn test_cors_preflight() {
        let mut config = ServerConfig::default();
        config.cors.allowed_origins = vec!["http://localhost:3000".to_string()];
        let server = TestServer::spawn_with(config, build_registry(test_signer()).unwrap()).await;

        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, server.url("/GetChatHistory"))
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
        server.stop().await;
    }
}
