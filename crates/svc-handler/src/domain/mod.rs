//! Domain types for the handler registry.

pub mod config;
pub mod correlation;
pub mod error;

pub use config::*;
pub use correlation::*;
pub use error::*;
