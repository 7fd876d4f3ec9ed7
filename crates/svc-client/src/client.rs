//! Service client over HTTP.

use crate::errors::ClientError;
use crate::storage::SessionStorage;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use svc_descriptor::{
    parse_message, serialize_message, AuthedServiceDescriptor, Message,
    UnauthedServiceDescriptor, SIGNED_SESSION_FIELD,
};
use tracing::{debug, warn};

/// Typed client calling services at one origin.
pub struct ServiceClient<S> {
    client: Client,
    origin: String,
    storage: S,
}

impl<S: SessionStorage> ServiceClient<S> {
    /// Create a client for `origin` (e.g. `http://localhost:8080`).
    pub fn new(origin: impl Into<String>, storage: S) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self::with_client(client, origin, storage))
    }

    /// Create a client reusing an existing `reqwest` client.
    pub fn with_client(client: Client, origin: impl Into<String>, storage: S) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self {
            client,
            origin,
            storage,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Store a signed session for later authed calls.
    pub fn save_session(&self, token: &str) -> Result<(), ClientError> {
        Ok(self.storage.save(token)?)
    }

    pub fn clear_session(&self) -> Result<(), ClientError> {
        Ok(self.storage.clear()?)
    }

    pub fn has_session(&self) -> Result<bool, ClientError> {
        Ok(self.storage.load()?.is_some())
    }

    /// Call a service that needs no session.
    pub async fn fetch_unauthed<Req: Message, Resp: Message>(
        &self,
        request: &Req,
        descriptor: &UnauthedServiceDescriptor<Req, Resp>,
    ) -> Result<Resp, ClientError> {
        let body = serialize_message(request)?;
        let raw = self.post(descriptor.path, &body).await?;
        Ok(parse_message(&raw)?)
    }

    /// Call a service with the stored signed session.
    ///
    /// Fails with [`ClientError::Unauthenticated`] without a network call if
    /// no session is stored. A 401 reply clears the stored session.
    pub async fn fetch_authed<Req: Message, Resp: Message>(
        &self,
        request: &Req,
        descriptor: &AuthedServiceDescriptor<Req, Resp>,
    ) -> Result<Resp, ClientError> {
        let token = self
            .storage
            .load()?
            .ok_or(ClientError::Unauthenticated)?;

        let mut body = serialize_message(request)?;
        if let Value::Object(fields) = &mut body {
            fields.insert(SIGNED_SESSION_FIELD.to_string(), Value::String(token));
        }

        match self.post(descriptor.path, &body).await {
            Ok(raw) => Ok(parse_message(&raw)?),
            Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED.as_u16()) => {
                warn!(service = descriptor.name, "Session rejected; clearing stored session");
                self.storage.clear()?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Full URL of a service path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.origin, path.trim_start_matches('/'))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        let url = self.url(path);
        debug!(%url, "Calling service");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ClientError::Connection(format!("Cannot connect to {}", self.origin))
                } else {
                    ClientError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("<unreadable body: {e}>"),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}
