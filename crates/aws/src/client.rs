//! Secrets Manager client seam
//!
//! [`SecretsManager`](crate::SecretsManager) talks to the store only through
//! [`SecretsManagerApi`], so the SDK client, the in-memory
//! [`FakeSecretsManagerClient`](crate::FakeSecretsManagerClient) or any other
//! backend speaking the same request/response shape can be plugged in.

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use secretsync_secrets::ClientError;

/// Input of a `GetSecretValue` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretValueRequest {
    /// Secret name or ARN
    pub secret_id: String,
    /// Version stage label (or version selector) to fetch
    pub version_stage: String,
}

/// Output of a `GetSecretValue` call
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretValueResponse {
    /// Textual payload
    pub secret_string: Option<String>,
    /// Binary payload
    pub secret_binary: Option<Vec<u8>>,
}

impl std::fmt::Debug for SecretValueResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretValueResponse")
            .field(
                "secret_string",
                &self.secret_string.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "secret_binary",
                &self.secret_binary.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl SecretValueResponse {
    /// Response carrying a textual payload
    #[must_use]
    pub fn from_string(value: impl Into<String>) -> Self {
        Self {
            secret_string: Some(value.into()),
            secret_binary: None,
        }
    }

    /// Response carrying a binary payload
    #[must_use]
    pub fn from_binary(value: impl Into<Vec<u8>>) -> Self {
        Self {
            secret_string: None,
            secret_binary: Some(value.into()),
        }
    }
}

/// The single Secrets Manager operation the provider depends on.
#[async_trait]
pub trait SecretsManagerApi: Send + Sync {
    /// Fetch one version of a secret.
    async fn get_secret_value(
        &self,
        request: SecretValueRequest,
    ) -> Result<SecretValueResponse, ClientError>;
}

#[async_trait]
impl SecretsManagerApi for Client {
    async fn get_secret_value(
        &self,
        request: SecretValueRequest,
    ) -> Result<SecretValueResponse, ClientError> {
        let output = Self::get_secret_value(self)
            .secret_id(&request.secret_id)
            .version_stage(&request.version_stage)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    secret_id = %request.secret_id,
                    version_stage = %request.version_stage,
                    error = %DisplayErrorContext(&e),
                    "GetSecretValue failed"
                );
                Box::new(e) as ClientError
            })?;

        Ok(SecretValueResponse {
            secret_string: output.secret_string().map(str::to_owned),
            secret_binary: output.secret_binary().map(|blob| blob.clone().into_inner()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_constructors() {
        let text = SecretValueResponse::from_string("RRRRR");
        assert_eq!(text.secret_string.as_deref(), Some("RRRRR"));
        assert!(text.secret_binary.is_none());

        let binary = SecretValueResponse::from_binary(b"yesplease".to_vec());
        assert!(binary.secret_string.is_none());
        assert_eq!(binary.secret_binary.as_deref(), Some(&b"yesplease"[..]));
    }

    #[test]
    fn test_response_debug_is_redacted() {
        let debug = format!("{:?}", SecretValueResponse::from_string("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
