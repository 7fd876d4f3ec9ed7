//! # Service Descriptors
//!
//! Binds a request message, a response message and a URL path.
//!
//! Two variants exist:
//!
//! - [`UnauthedServiceDescriptor`]: callable without a session.
//! - [`AuthedServiceDescriptor`]: the request body must carry a signed session
//!   in the [`SIGNED_SESSION_FIELD`] field.
//!
//! Both are declared as `static` values and are immutable.

use crate::message::{Message, MessageDescriptor};
use std::fmt;
use std::marker::PhantomData;

/// Body field that carries the signed session of an authed request.
pub const SIGNED_SESSION_FIELD: &str = "signedSession";

/// Whether a service requires a verified session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Unauthed,
    Authed,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Unauthed => write!(f, "unauthed"),
            ServiceKind::Authed => write!(f, "authed"),
        }
    }
}

/// Untyped view of a service descriptor, used for registration checks,
/// routing tables and logging.
#[derive(Debug, Clone, Copy)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub path: &'static str,
    pub kind: ServiceKind,
    pub request: &'static MessageDescriptor,
    pub response: &'static MessageDescriptor,
}

/// A service callable without a session.
pub struct UnauthedServiceDescriptor<Req, Resp> {
    /// Unique service name.
    pub name: &'static str,
    /// Unique URL path, starting with `/`.
    pub path: &'static str,
    _types: PhantomData<fn() -> (Req, Resp)>,
}

impl<Req: Message, Resp: Message> UnauthedServiceDescriptor<Req, Resp> {
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            _types: PhantomData,
        }
    }

    pub fn request_descriptor(&self) -> &'static MessageDescriptor {
        Req::descriptor()
    }

    pub fn response_descriptor(&self) -> &'static MessageDescriptor {
        Resp::descriptor()
    }

    pub fn info(&self) -> ServiceInfo {
        ServiceInfo {
            name: self.name,
            path: self.path,
            kind: ServiceKind::Unauthed,
            request: Req::descriptor(),
            response: Resp::descriptor(),
        }
    }
}

/// A service that requires a signed session.
///
/// The request message should declare a `signedSession` string field; the
/// client fills it and the registry verifies it before the handler runs.
pub struct AuthedServiceDescriptor<Req, Resp> {
    /// Unique service name.
    pub name: &'static str,
    /// Unique URL path, starting with `/`.
    pub path: &'static str,
    _types: PhantomData<fn() -> (Req, Resp)>,
}

impl<Req: Message, Resp: Message> AuthedServiceDescriptor<Req, Resp> {
    pub const fn new(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            _types: PhantomData,
        }
    }

    pub fn request_descriptor(&self) -> &'static MessageDescriptor {
        Req::descriptor()
    }

    pub fn response_descriptor(&self) -> &'static MessageDescriptor {
        Resp::descriptor()
    }

    pub fn info(&self) -> ServiceInfo {
        ServiceInfo {
            name: self.name,
            path: self.path,
            kind: ServiceKind::Authed,
            request: Req::descriptor(),
            response: Resp::descriptor(),
        }
    }
}

impl<Req, Resp> fmt::Debug for UnauthedServiceDescriptor<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnauthedServiceDescriptor")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

impl<Req, Resp> fmt::Debug for AuthedServiceDescriptor<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthedServiceDescriptor")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}
