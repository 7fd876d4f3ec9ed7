//! Cross-crate scenarios over a real HTTP server.

pub mod auth_gate;
pub mod chat_flow;
pub mod dispatch;
