//! In-memory Secrets Manager client for testing

use crate::client::{SecretValueRequest, SecretValueResponse, SecretsManagerApi};
use async_trait::async_trait;
use secretsync_secrets::ClientError;

/// Fake [`SecretsManagerApi`] that answers one expected request.
///
/// Any request that differs from the expected one fails, which lets tests
/// assert the exact secret id and version stage the provider sends.
#[derive(Debug, Clone, Default)]
pub struct FakeSecretsManagerClient {
    expected: Option<SecretValueRequest>,
    outcome: Outcome,
}

#[derive(Debug, Clone)]
enum Outcome {
    Value(SecretValueResponse),
    Error(String),
}

impl Default for Outcome {
    fn default() -> Self {
        Self::Value(SecretValueResponse::default())
    }
}

impl FakeSecretsManagerClient {
    /// Create a fake that accepts any request and returns an empty response
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `expected` with `response`
    #[must_use]
    pub fn with_value(mut self, expected: SecretValueRequest, response: SecretValueResponse) -> Self {
        self.expected = Some(expected);
        self.outcome = Outcome::Value(response);
        self
    }

    /// Answer `expected` with an error carrying `message`
    #[must_use]
    pub fn with_error(mut self, expected: SecretValueRequest, message: impl Into<String>) -> Self {
        self.expected = Some(expected);
        self.outcome = Outcome::Error(message.into());
        self
    }
}

#[async_trait]
impl SecretsManagerApi for FakeSecretsManagerClient {
    async fn get_secret_value(
        &self,
        request: SecretValueRequest,
    ) -> Result<SecretValueResponse, ClientError> {
        if let Some(expected) = self.expected.as_ref().filter(|e| **e != request) {
            return Err(format!(
                "unexpected test argument: expected {expected:?}, got {request:?}"
            )
            .into());
        }

        match &self.outcome {
            Outcome::Value(response) => Ok(response.clone()),
            Outcome::Error(message) => Err(message.clone().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(secret_id: &str) -> SecretValueRequest {
        SecretValueRequest {
            secret_id: secret_id.to_string(),
            version_stage: "AWSCURRENT".to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_configured_value() {
        let fake = FakeSecretsManagerClient::new()
            .with_value(request("/baz"), SecretValueResponse::from_string("RRRRR"));

        let response = fake.get_secret_value(request("/baz")).await.unwrap();
        assert_eq!(response.secret_string.as_deref(), Some("RRRRR"));
    }

    #[tokio::test]
    async fn test_returns_configured_error() {
        let fake = FakeSecretsManagerClient::new().with_error(request("/baz"), "oh no");

        let err = fake.get_secret_value(request("/baz")).await.unwrap_err();
        assert_eq!(err.to_string(), "oh no");
    }

    #[tokio::test]
    async fn test_rejects_unexpected_request() {
        let fake = FakeSecretsManagerClient::new()
            .with_value(request("/baz"), SecretValueResponse::from_string("RRRRR"));

        let err = fake.get_secret_value(request("/other")).await.unwrap_err();
        assert!(err.to_string().contains("unexpected test argument"));
    }

    #[tokio::test]
    async fn test_default_accepts_anything() {
        let response = FakeSecretsManagerClient::new()
            .get_secret_value(request("/anything"))
            .await
            .unwrap();
        assert_eq!(response, SecretValueResponse::default());
    }
}
