//! Model gateway: the only component that talks to the completion service.
//!
//! ```text
//! Planner --complete(prompt)--> &dyn CompletionService --> raw text
//!                                      |
//!                                      +-- GeminiGateway (HTTP, generateContent)
//!                                      +-- test stubs
//! ```

pub mod config;
pub mod gemini;
pub mod trait_def;

pub use config::{GatewayConfig, GatewayConfigError};
pub use gemini::GeminiGateway;
pub use trait_def::CompletionService;
