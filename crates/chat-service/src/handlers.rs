//! Chat service handlers.

use crate::messages::{
    ChatEntry, GetChatHistoryRequest, GetChatHistoryResponse, SignInRequest, SignInResponse,
    UserSession,
};
use crate::services::{GET_CHAT_HISTORY, SIGN_IN};
use async_trait::async_trait;
use std::sync::Arc;
use svc_descriptor::{AuthedServiceDescriptor, UnauthedServiceDescriptor};
use svc_handler::{ApiError, ApiResult, AuthedHandler, LogContext, UnauthedHandler};
use svc_session::SessionSigner;
use tracing::info;

const DEMO_PASSWORD: &str = "correct password";
const DEMO_USER_ID: &str = "a random id";

/// Issues a signed session for the demo password.
pub struct SignInHandler {
    signer: Arc<SessionSigner>,
}

impl SignInHandler {
    pub fn new(signer: Arc<SessionSigner>) -> Self {
        Self { signer }
    }
}

#[async_trait]
impl UnauthedHandler for SignInHandler {
    type Request = SignInRequest;
    type Response = SignInResponse;

    fn descriptor(&self) -> &'static UnauthedServiceDescriptor<SignInRequest, SignInResponse> {
        &SIGN_IN
    }

    async fn handle(&self, ctx: &LogContext, request: SignInRequest) -> ApiResult<SignInResponse> {
        info!("{}Signing in with email {:?}", ctx, request.email);
        if request.password.as_deref() != Some(DEMO_PASSWORD) {
            return Ok(SignInResponse::default());
        }

        let session = UserSession {
            user_id: Some(DEMO_USER_ID.to_string()),
        };
        let signed = self
            .signer
            .build_session(&session)
            .map_err(|e| ApiError::internal(format!("failed to build session: {}", e)))?;

        Ok(SignInResponse {
            signed_session: Some(signed.into_string()),
        })
    }
}

/// Returns a fixed chat history for any channel.
#[derive(Debug, Default)]
pub struct GetChatHistoryHandler;

impl GetChatHistoryHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthedHandler for GetChatHistoryHandler {
    type Request = GetChatHistoryRequest;
    type Response = GetChatHistoryResponse;
    type Session = UserSession;

    fn descriptor(
        &self,
    ) -> &'static AuthedServiceDescriptor<GetChatHistoryRequest, GetChatHistoryResponse> {
        &GET_CHAT_HISTORY
    }

    async fn handle(
        &self,
        ctx: &LogContext,
        request: GetChatHistoryRequest,
        session: UserSession,
    ) -> ApiResult<GetChatHistoryResponse> {
        info!(
            "{}Handling GetChatHistory for the user {:?} and the channel {:?}",
            ctx, session.user_id, request.channel_id
        );
        Ok(GetChatHistoryResponse {
            chat_entries: Some(vec![ChatEntry {
                content: Some("something".to_string()),
                timestamp: Some(1234567),
            }]),
        })
    }
}
