//! Handler contracts.
//!
//! A service is implemented by exactly one of the two traits below and
//! registered with [`HandlerRegistry`](crate::HandlerRegistry). The registry
//! parses the request, verifies the session for authed services, and
//! serializes the response; handlers only see typed values.

use crate::domain::{ApiResult, LogContext};
use async_trait::async_trait;
use svc_descriptor::{AuthedServiceDescriptor, Message, UnauthedServiceDescriptor};

/// Handler for a service callable without a session.
#[async_trait]
pub trait UnauthedHandler: Send + Sync + 'static {
    type Request: Message;
    type Response: Message;

    fn descriptor(&self) -> &'static UnauthedServiceDescriptor<Self::Request, Self::Response>;

    async fn handle(&self, ctx: &LogContext, request: Self::Request)
        -> ApiResult<Self::Response>;
}

/// Handler for a service that requires a verified session.
///
/// `Session` is the application's session message; the registry parses the
/// verified payload through its descriptor before calling [`handle`](Self::handle).
#[async_trait]
pub trait AuthedHandler: Send + Sync + 'static {
    type Request: Message;
    type Response: Message;
    type Session: Message;

    fn descriptor(&self) -> &'static AuthedServiceDescriptor<Self::Request, Self::Response>;

    async fn handle(
        &self,
        ctx: &LogContext,
        request: Self::Request,
        session: Self::Session,
    ) -> ApiResult<Self::Response>;
}
