//! # Service Descriptor Crate
//!
//! Schema values that drive serialization and dispatch for typed
//! request/response services.
//!
//! ## Design Principles
//!
//! - **Descriptors are data**: every message type is paired with an explicit
//!   [`MessageDescriptor`] listing its fields in declaration order. Parsing and
//!   serialization are generic functions over the descriptor, not per-type code.
//! - **Forward compatible parsing**: unknown keys are dropped and ill-typed
//!   fields are left absent instead of failing the whole message.
//! - **Paths are dispatch keys**: a [`UnauthedServiceDescriptor`] or
//!   [`AuthedServiceDescriptor`] binds a request type, a response type and the
//!   URL path the server routes on.
//!
//! ## Declaring a message
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use svc_descriptor::{FieldSpec, Message, MessageDescriptor, PrimitiveType};
//!
//! #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct SignInRequest {
//!     pub email: Option<String>,
//!     pub password: Option<String>,
//! }
//!
//! pub static SIGN_IN_REQUEST: MessageDescriptor = MessageDescriptor {
//!     name: "SignInRequest",
//!     fields: &[
//!         FieldSpec::primitive("email", PrimitiveType::String),
//!         FieldSpec::primitive("password", PrimitiveType::String),
//!     ],
//! };
//!
//! impl Message for SignInRequest {
//!     fn descriptor() -> &'static MessageDescriptor {
//!         &SIGN_IN_REQUEST
//!     }
//! }
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod message;
pub mod service;

pub use errors::DescriptorError;
pub use message::{
    parse_message, parse_value, serialize_message, serialize_value, FieldSpec, FieldType, Message,
    MessageDescriptor, PrimitiveType,
};
pub use service::{
    AuthedServiceDescriptor, ServiceInfo, ServiceKind, UnauthedServiceDescriptor,
    SIGNED_SESSION_FIELD,
};
