//! Chat message types and their descriptors.

use serde::{Deserialize, Serialize};
use svc_descriptor::{FieldSpec, Message, MessageDescriptor, PrimitiveType};

// =============================================================================
// CHAT ENTRY
// =============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub content: Option<String>,
    /// Seconds since the Unix epoch
    pub timestamp: Option<i64>,
}

pub static CHAT_ENTRY: MessageDescriptor = MessageDescriptor {
    name: "ChatEntry",
    fields: &[
        FieldSpec::primitive("content", PrimitiveType::String),
        FieldSpec::primitive("timestamp", PrimitiveType::Integer),
    ],
};

impl Message for ChatEntry {
    fn descriptor() -> &'static MessageDescriptor {
        &CHAT_ENTRY
    }
}

// =============================================================================
// SIGN IN
// =============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub static SIGN_IN_REQUEST: MessageDescriptor = MessageDescriptor {
    name: "SignInRequest",
    fields: &[
        FieldSpec::primitive("email", PrimitiveType::String),
        FieldSpec::primitive("password", PrimitiveType::String),
    ],
};

impl Message for SignInRequest {
    fn descriptor() -> &'static MessageDescriptor {
        &SIGN_IN_REQUEST
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub signed_session: Option<String>,
}

pub static SIGN_IN_RESPONSE: MessageDescriptor = MessageDescriptor {
    name: "SignInResponse",
    fields: &[FieldSpec::primitive("signedSession", PrimitiveType::String)],
};

impl Message for SignInResponse {
    fn descriptor() -> &'static MessageDescriptor {
        &SIGN_IN_RESPONSE
    }
}

// =============================================================================
// GET CHAT HISTORY
// =============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetChatHistoryRequest {
    /// Filled by the client from session storage
    pub signed_session: Option<String>,
    pub channel_id: Option<String>,
    pub cursor: Option<String>,
}

pub static GET_CHAT_HISTORY_REQUEST: MessageDescriptor = MessageDescriptor {
    name: "GetChatHistoryRequest",
    fields: &[
        FieldSpec::primitive("signedSession", PrimitiveType::String),
        FieldSpec::primitive("channelId", PrimitiveType::String),
        FieldSpec::primitive("cursor", PrimitiveType::String),
    ],
};

impl Message for GetChatHistoryRequest {
    fn descriptor() -> &'static MessageDescriptor {
        &GET_CHAT_HISTORY_REQUEST
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetChatHistoryResponse {
    pub chat_entries: Option<Vec<ChatEntry>>,
}

pub static GET_CHAT_HISTORY_RESPONSE: MessageDescriptor = MessageDescriptor {
    name: "GetChatHistoryResponse",
    fields: &[FieldSpec::message("chatEntries", &CHAT_ENTRY).array()],
};

impl Message for GetChatHistoryResponse {
    fn descriptor() -> &'static MessageDescriptor {
        &GET_CHAT_HISTORY_RESPONSE
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Payload of a chat signed session.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: Option<String>,
}

pub static USER_SESSION: MessageDescriptor = MessageDescriptor {
    name: "UserSession",
    fields: &[FieldSpec::primitive("userId", PrimitiveType::String)],
};

impl Message for UserSession {
    fn descriptor() -> &'static MessageDescriptor {
        &USER_SESSION
    }
}
