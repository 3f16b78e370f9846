//! Process-lifetime cache for the reverse-proxy shared secret.
//!
//! The secret is assumed always present in a correctly configured
//! deployment, so unlike [`crate::resolver`] there is no absence outcome:
//! a fetch that yields nothing is a hard error. The cached form is the raw
//! secret string, not a decoded JSON object.

use tokio::sync::OnceCell;

use crate::store::{SecretStore, StoreError, StoreOutcome};

#[derive(Debug, thiserror::Error)]
pub enum ProxySecretError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The store has no string value under the reverse-proxy secret name.
    /// Deployment misconfiguration, fatal to the caller.
    #[error("reverse-proxy secret '{name}' has no string value")]
    Missing { name: String },
}

/// Holds the reverse-proxy secret, populated by at most one successful
/// store fetch per cache lifetime.
///
/// A failed fetch leaves the slot empty, so a later call transparently
/// retries. Once populated, every call returns the same value without
/// touching the store again.
pub struct ProxySecretCache {
    slot: OnceCell<String>,
}

impl ProxySecretCache {
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::const_new(),
        }
    }

    /// Returns the cached secret, fetching `secret_id` from the store on
    /// first use.
    pub async fn get<S: SecretStore>(
        &self,
        store: &S,
        secret_id: &str,
    ) -> Result<&str, ProxySecretError> {
        let value = self
            .slot
            .get_or_try_init(|| async {
                match store.fetch(secret_id).await? {
                    StoreOutcome::Found(raw) => raw.string.ok_or_else(|| {
                        ProxySecretError::Missing {
                            name: secret_id.to_string(),
                        }
                    }),
                    StoreOutcome::NotFound => Err(ProxySecretError::Missing {
                        name: secret_id.to_string(),
                    }),
                }
            })
            .await?;
        Ok(value)
    }
}

impl Default for ProxySecretCache {
    fn default() -> Self {
        Self::new()
    }
}

static PROXY_SECRET: ProxySecretCache = ProxySecretCache::new();

/// Process-wide accessor for the reverse-proxy secret.
pub async fn proxy_secret<S: SecretStore>(
    store: &S,
    secret_id: &str,
) -> Result<&'static str, ProxySecretError> {
    PROXY_SECRET.get(store, secret_id).await
}
