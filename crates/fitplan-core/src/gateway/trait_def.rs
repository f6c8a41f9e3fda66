//! The `CompletionService` trait -- the single seam to the language model.
//!
//! Implementations own exactly one outbound call per [`CompletionService::complete`]
//! and translate every transport or provider failure into a
//! [`ServiceError`]. They know nothing about prompt content or the shape of
//! the answer; callers sanitize and coerce the returned text themselves.

use async_trait::async_trait;

use crate::error::ServiceError;

/// An opaque text-completion service.
///
/// The trait is object-safe so the facade can hold a
/// `Box<dyn CompletionService>` and tests can substitute a canned stub.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Model identifier requests are sent to (for logs and diagnostics).
    fn model(&self) -> &str;

    /// Send `prompt` and return the raw text of the answer.
    ///
    /// Single attempt: no retries, no streaming, and no timeout beyond
    /// whatever the underlying client applies by default.
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}

// Compile-time assertion: CompletionService must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn CompletionService) {}
};
