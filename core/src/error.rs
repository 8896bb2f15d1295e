//! Error types for the todo API client.
//!
//! `NotFound` gets its own variant because callers distinguish "the todo does
//! not exist" from other failures. Every other non-success status lands in
//! `HttpError` carrying the server's `error` message when one was sent.

/// Errors returned by `TodoClient` parse methods and reported by hosts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404; the referenced todo does not exist.
    #[error("todo not found")]
    NotFound,

    /// The server returned an unexpected status other than 404.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The request never produced a response (connection refused, reset, ..).
    #[error("network error: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
