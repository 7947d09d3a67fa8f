//! Chat proxy for the tax estimator site.
//!
//! Accepts a message plus the client's recent history, prefixes a system
//! prompt built from a knowledge base, forwards the conversation to the
//! configured language-model provider and returns a sanitised reply with a
//! detected topic. No conversation state is held server side.

pub mod config;
pub mod error;
pub mod history;
pub mod prompt;
pub mod provider;
pub mod routes;
pub mod sanitize;
pub mod topic;

pub use config::{ChatConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::{AppState, ChatbotResponse, app};
