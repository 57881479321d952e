//! Secret retrieval contract for secretsync
//!
//! Defines the provider-neutral pieces every secret store adapter shares:
//!
//! - [`RemoteRef`]: what the caller asks for (key, version, property path)
//! - [`SecretsProvider`]: the two retrieval operations an adapter exposes
//! - [`SecretError`]: the error taxonomy returned by those operations
//! - [`property`]: JSON property-path extraction and flat map decoding
//!
//! Store adapters live in separate crates:
//! - secretsync-aws: `SecretsManager`, `SessionConfig`

pub mod property;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Boxed error returned by a remote store client.
pub type ClientError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for secret retrieval
#[derive(Debug, Error)]
pub enum SecretError {
    /// The remote store call failed; the client's error is surfaced as-is
    #[error("{0}")]
    RemoteCall(#[source] ClientError),

    /// The store answered without a textual or binary payload
    #[error("no secret string nor binary for key: {key}")]
    PayloadMissing {
        /// Requested secret key
        key: String,
    },

    /// The property path did not resolve (malformed JSON or absent field)
    #[error("key {property} does not exist in secret")]
    PropertyNotFound {
        /// Requested property path
        property: String,
    },

    /// The payload is not a flat JSON object of scalar values
    #[error("unable to unmarshal secret {key}: {message}")]
    MapDeserialization {
        /// Requested secret key
        key: String,
        /// Decoder detail
        message: String,
    },

    /// The provider could not be constructed from its configuration
    #[error("invalid provider configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration
        message: String,
    },
}

impl SecretError {
    /// Wrap a remote client failure without reinterpreting it.
    pub fn remote(err: impl Into<ClientError>) -> Self {
        Self::RemoteCall(err.into())
    }
}

/// Reference to a secret in a remote store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRef {
    /// Secret key - name, path or ARN depending on the store
    pub key: String,

    /// Version selector; the store's "current" version when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Dot-separated JSON property path to extract from the payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl RemoteRef {
    /// Create a reference to the current version of a secret
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version: None,
            property: None,
        }
    }

    /// Select a specific version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Extract a single property from a JSON payload
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// The requested version, with an empty string treated as unset
    #[must_use]
    pub fn version_selector(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }

    /// The requested property path, with an empty string treated as unset
    #[must_use]
    pub fn property_path(&self) -> Option<&str> {
        self.property.as_deref().filter(|p| !p.is_empty())
    }
}

/// A secret store adapter.
///
/// Both operations issue exactly one request to the store per call and hold
/// no state between calls, so a provider can be shared across tasks.
#[async_trait]
pub trait SecretsProvider: Send + Sync {
    /// Fetch a secret value, or the property selected by
    /// [`RemoteRef::property`], as raw bytes.
    async fn get_secret(&self, remote_ref: &RemoteRef) -> Result<Vec<u8>, SecretError>;

    /// Fetch a secret whose payload is a flat JSON object as key/value pairs.
    ///
    /// [`RemoteRef::property`] is ignored.
    async fn get_secret_map(
        &self,
        remote_ref: &RemoteRef,
    ) -> Result<HashMap<String, String>, SecretError>;
}
