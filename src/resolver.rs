//! Secret resolution on top of the raw store.
//!
//! A resolved secret is the JSON object stored in its text form. Absence
//! (`Ok(None)`) means the store has no usable value; a fatal store error or
//! a malformed payload is an `Err` the caller must not ignore.

use serde_json::{Map, Value};

use crate::store::{SecretStore, StoreError, StoreOutcome};

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The stored text is not a JSON object. Payload corruption is a data
    /// bug, not an expected runtime condition, so it is never reported as
    /// absence.
    #[error("secret '{name}' payload is not a valid JSON object")]
    MalformedPayload {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolves application secrets by name, decoding their JSON payloads.
pub struct SecretResolver<S> {
    store: S,
    application: String,
}

impl<S: SecretStore> SecretResolver<S> {
    /// `application` is the namespace prefix for application-scoped secrets
    /// (stored under `{application}/{logical_name}`).
    pub fn new(store: S, application: impl Into<String>) -> Self {
        Self {
            store,
            application: application.into(),
        }
    }

    /// Resolves an application-scoped secret by its logical name.
    pub async fn resolve_application_secret(
        &self,
        logical_name: &str,
    ) -> Result<Option<Map<String, Value>>, SecretError> {
        let name = format!("{}/{}", self.application, logical_name);
        self.resolve_secret(&name).await
    }

    /// Resolves a secret by its full store name.
    ///
    /// Returns `Ok(None)` when the store has no value for the name, or when
    /// the value only exists in binary form (this layer decodes text-form
    /// secrets only).
    pub async fn resolve_secret(
        &self,
        name: &str,
    ) -> Result<Option<Map<String, Value>>, SecretError> {
        match self.store.fetch(name).await? {
            StoreOutcome::NotFound => Ok(None),
            StoreOutcome::Found(raw) => match raw.string {
                None => Ok(None),
                Some(text) => {
                    let decoded = serde_json::from_str(&text).map_err(|source| {
                        SecretError::MalformedPayload {
                            name: name.to_string(),
                            source,
                        }
                    })?;
                    Ok(Some(decoded))
                }
            },
        }
    }

    /// Fetches the analyzer API key from the application-scoped secret at
    /// `api_key_location`, reading its `"key"` field.
    pub async fn analyzer_api_key(
        &self,
        api_key_location: &str,
    ) -> Result<Option<String>, SecretError> {
        let Some(secret) = self.resolve_application_secret(api_key_location).await? else {
            return Ok(None);
        };
        Ok(secret
            .get("key")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}
