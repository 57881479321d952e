//! AWS Secrets Manager secret provider

use crate::client::{SecretValueRequest, SecretValueResponse, SecretsManagerApi};
use crate::session::SessionConfig;
use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use secretsync_secrets::{RemoteRef, SecretError, SecretsProvider, property};
use std::collections::HashMap;

/// Version stage selected when a [`RemoteRef`] names no version
pub const DEFAULT_VERSION_STAGE: &str = "AWSCURRENT";

/// Fetches secrets from AWS Secrets Manager
///
/// Each call issues a single `GetSecretValue` request for
/// [`RemoteRef::key`]. The version stage is [`RemoteRef::version`] when set
/// and non-empty, [`DEFAULT_VERSION_STAGE`] otherwise. An empty
/// [`RemoteRef::property`] likewise returns the whole payload.
///
/// Textual payloads take precedence over binary ones; a response with
/// neither is an error.
pub struct SecretsManager<C = Client> {
    client: C,
}

impl<C> std::fmt::Debug for SecretsManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsManager").finish_non_exhaustive()
    }
}

impl SecretsManager<Client> {
    /// Create a provider backed by an SDK client built from `session`
    ///
    /// # Errors
    /// Returns [`SecretError::InvalidConfig`] if the session is incomplete.
    pub async fn from_session(session: &SessionConfig) -> Result<Self, SecretError> {
        Ok(Self::new(session.build_client().await?))
    }

    /// Create a provider configured from `SECRETSYNC_AWS_*` variables
    ///
    /// # Errors
    /// Returns [`SecretError::InvalidConfig`] if the environment holds an
    /// incomplete key pair.
    pub async fn from_env() -> Result<Self, SecretError> {
        Self::from_session(&SessionConfig::from_env()).await
    }
}

impl<C: SecretsManagerApi> SecretsManager<C> {
    /// Create a provider over any [`SecretsManagerApi`] client
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    fn build_request(remote_ref: &RemoteRef) -> SecretValueRequest {
        SecretValueRequest {
            secret_id: remote_ref.key.clone(),
            version_stage: remote_ref
                .version_selector()
                .unwrap_or(DEFAULT_VERSION_STAGE)
                .to_string(),
        }
    }

    /// Fetch the payload for `remote_ref`, text first then binary
    async fn fetch_payload(&self, remote_ref: &RemoteRef) -> Result<Vec<u8>, SecretError> {
        let request = Self::build_request(remote_ref);
        tracing::debug!(
            secret_id = %request.secret_id,
            version_stage = %request.version_stage,
            "Fetching secret value"
        );

        let response = self
            .client
            .get_secret_value(request)
            .await
            .map_err(SecretError::RemoteCall)?;

        select_payload(&remote_ref.key, response)
    }
}

/// Pick the textual payload when present and non-empty, else the binary one.
///
/// An empty textual payload counts as absent: with no binary payload
/// alongside it the result is [`SecretError::PayloadMissing`], not empty bytes.
fn select_payload(key: &str, response: SecretValueResponse) -> Result<Vec<u8>, SecretError> {
    match response {
        SecretValueResponse {
            secret_string: Some(text),
            ..
        } if !text.is_empty() => Ok(text.into_bytes()),
        SecretValueResponse {
            secret_binary: Some(binary),
            ..
        } => {
            tracing::debug!(key, "Secret has no string value, using binary payload");
            Ok(binary)
        }
        _ => Err(SecretError::PayloadMissing {
            key: key.to_string(),
        }),
    }
}

#[async_trait]
impl<C: SecretsManagerApi> SecretsProvider for SecretsManager<C> {
    async fn get_secret(&self, remote_ref: &RemoteRef) -> Result<Vec<u8>, SecretError> {
        let payload = self.fetch_payload(remote_ref).await?;

        let Some(path) = remote_ref.property_path() else {
            return Ok(payload);
        };

        property::extract(&payload, path)
            .map(property::value_bytes)
            .ok_or_else(|| SecretError::PropertyNotFound {
                property: path.to_string(),
            })
    }

    async fn get_secret_map(
        &self,
        remote_ref: &RemoteRef,
    ) -> Result<HashMap<String, String>, SecretError> {
        let payload = self.fetch_payload(remote_ref).await?;

        property::decode_flat_map(&payload).map_err(|e| SecretError::MapDeserialization {
            key: remote_ref.key.clone(),
            message: e.to_string(),
        })
    }
}
