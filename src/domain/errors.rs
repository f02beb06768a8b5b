//! Domain errors. Used by ports and use cases.
//!
//! The gateway adapter classifies every backend outcome into `GatewayError`
//! exactly once, at the boundary; use cases map those into the operation's
//! typed error. Nothing crosses the public contract as a panic.

use thiserror::Error;

/// Raw outcome classification at the backend boundary.
///
/// `Api` is a 4xx/5xx business response (the request reached the backend);
/// `Transport` is a connection, timeout, or decode failure; `Unconfigured`
/// means the client has no usable credentials and no call was attempted.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("backend error {code}: {message}")]
    Api { code: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend credentials missing or placeholder")]
    Unconfigured,
}

/// Login and sign-up failures.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Sign-up rejected by backend validation (duplicate username,
    /// malformed email, ...). Carries the backend's message verbatim.
    #[error("sign-up rejected: {0}")]
    Rejected(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend is not configured")]
    BackendUnavailable,
}

/// Session refresh/logout failures. The cached identity is left untouched
/// whenever one of these is returned.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend is not configured")]
    BackendUnavailable,
}

/// Gallery list/delete failures.
#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
    /// The item no longer exists. Benign on delete: the desired end state
    /// (item gone) holds either way.
    #[error("gallery item not found")]
    NotFound,

    #[error("not authorized to modify this gallery item")]
    Unauthorized,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend is not configured")]
    BackendUnavailable,
}

/// Upload pipeline failures. Validation variants are produced before any
/// network call; the rest are classified per pipeline stage.
#[derive(Error, Debug, Clone)]
pub enum UploadError {
    #[error("unsupported file type {0:?}, expected JPEG or PNG")]
    InvalidType(String),

    #[error("file is {0} bytes, larger than the 5 MiB limit")]
    TooLarge(u64),

    #[error("title must not be empty")]
    MissingTitle,

    #[error("file storage failed: {0}")]
    StorageError(String),

    /// Record creation failed after the blob was stored. The blob is
    /// orphaned; no compensating delete is attempted.
    #[error("file stored but gallery record creation failed: {0}")]
    PartialUpload(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend is not configured")]
    BackendUnavailable,
}

impl From<GatewayError> for SessionError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Unconfigured => SessionError::BackendUnavailable,
            GatewayError::Api { code, message } => {
                SessionError::Transport(format!("unexpected backend response {code}: {message}"))
            }
            GatewayError::Transport(msg) => SessionError::Transport(msg),
        }
    }
}

impl From<GatewayError> for RepositoryError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Unconfigured => RepositoryError::BackendUnavailable,
            GatewayError::Api { code: 404, .. } => RepositoryError::NotFound,
            GatewayError::Api { code: 403, .. } => RepositoryError::Unauthorized,
            GatewayError::Api { code, message } => {
                RepositoryError::Transport(format!("unexpected backend response {code}: {message}"))
            }
            GatewayError::Transport(msg) => RepositoryError::Transport(msg),
        }
    }
}
