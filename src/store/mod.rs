//! Secret store access.
//!
//! [`SecretStore`] is the async trait for fetching one named secret.
//! [`SecretsManagerStore`] implements it against AWS Secrets Manager,
//! classifying store errors into the fatal set (propagated) and everything
//! else (logged and treated as absence).

mod secretsmanager;

pub use secretsmanager::SecretsManagerStore;

use std::fmt;

/// The raw value the store holds for a secret name.
///
/// A secret is stored either as text or as a binary blob; only the text form
/// is decoded further by the layers above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSecret {
    pub string: Option<String>,
    pub binary: Option<Vec<u8>>,
}

/// Outcome of a single store lookup that did not fail fatally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The store has a current value for the name.
    Found(RawSecret),
    /// The store returned no resolvable value. This covers both an empty
    /// response and any non-fatal store error (e.g. access denied on a
    /// lookup the caller may treat as "not configured").
    NotFound,
}

/// Store failure kinds that must never be swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalErrorKind {
    DecryptionFailure,
    InternalServiceError,
    InvalidParameter,
    InvalidRequest,
    ResourceNotFound,
}

impl fmt::Display for FatalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FatalErrorKind::DecryptionFailure => "decryption failure",
            FatalErrorKind::InternalServiceError => "internal service error",
            FatalErrorKind::InvalidParameter => "invalid parameter",
            FatalErrorKind::InvalidRequest => "invalid request",
            FatalErrorKind::ResourceNotFound => "resource not found",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store reported one of the fatal failure kinds. Callers must
    /// handle this explicitly; it is never converted to [`StoreOutcome::NotFound`].
    #[error("secret store failed fatally for '{name}': {kind}")]
    Fatal { name: String, kind: FatalErrorKind },
    /// The request never produced a store response (connection, timeout,
    /// request construction). Outside the classified set, so it propagates.
    #[error("secret store request for '{name}' failed")]
    Request {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

/// Fetches one named secret with a single request, no internal retry.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<StoreOutcome, StoreError>;
}
