//! Session configuration for building a Secrets Manager SDK client

use aws_config::BehaviorVersion;
use aws_config::sts::AssumeRoleProvider;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::config::{Credentials, Region};
use aws_smithy_http_client::{Builder as HttpClientBuilder, tls};
use secrecy::{ExposeSecret, SecretString};
use secretsync_secrets::SecretError;
use serde::{Deserialize, Deserializer};

const ACCESS_KEY_ID_ENV: &str = "SECRETSYNC_AWS_ACCESS_KEY_ID";
const SECRET_ACCESS_KEY_ENV: &str = "SECRETSYNC_AWS_SECRET_ACCESS_KEY";
const REGION_ENV: &str = "SECRETSYNC_AWS_REGION";
const ROLE_ARN_ENV: &str = "SECRETSYNC_AWS_ROLE_ARN";
const ENDPOINT_URL_ENV: &str = "SECRETSYNC_AWS_ENDPOINT_URL";

const STATIC_PROVIDER_NAME: &str = "secretsync-static";
const ROLE_SESSION_NAME: &str = "secretsync";

/// How to reach AWS Secrets Manager
///
/// Credentials come from the static key pair when both halves are set, and
/// from the SDK default provider chain otherwise. When `role_arn` is set the
/// role is assumed through STS on top of those base credentials.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Static access key id
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Static secret access key
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub secret_access_key: Option<SecretString>,

    /// Region; the SDK default region chain is used when absent
    #[serde(default)]
    pub region: Option<String>,

    /// Role to assume with the base credentials
    #[serde(default)]
    pub role_arn: Option<String>,

    /// Endpoint override (e.g. LocalStack)
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl SessionConfig {
    /// Create an empty config that defers everything to the SDK defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the config from `SECRETSYNC_AWS_*` environment variables.
    ///
    /// Blank values are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            access_key_id: non_blank_env(ACCESS_KEY_ID_ENV),
            secret_access_key: non_blank_env(SECRET_ACCESS_KEY_ENV).map(SecretString::from),
            region: non_blank_env(REGION_ENV),
            role_arn: non_blank_env(ROLE_ARN_ENV),
            endpoint_url: non_blank_env(ENDPOINT_URL_ENV),
        }
    }

    /// Use a static access key pair
    #[must_use]
    pub fn with_static_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(SecretString::from(secret_access_key.into()));
        self
    }

    /// Pin the region
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Assume a role on top of the base credentials
    #[must_use]
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = Some(role_arn.into());
        self
    }

    /// Send requests to a custom endpoint
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Static credentials, if configured.
    ///
    /// # Errors
    /// Returns [`SecretError::InvalidConfig`] when only one half of the key
    /// pair is set.
    fn static_credentials(&self) -> Result<Option<Credentials>, SecretError> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(Some(Credentials::new(
                access_key_id,
                secret_access_key.expose_secret(),
                None,
                None,
                STATIC_PROVIDER_NAME,
            ))),
            (None, None) => Ok(None),
            _ => Err(SecretError::InvalidConfig {
                message: "access key id and secret access key must be set together".to_string(),
            }),
        }
    }

    /// Build a Secrets Manager client for this session.
    ///
    /// No request is sent; credentials are resolved lazily on first use.
    ///
    /// # Errors
    /// Returns [`SecretError::InvalidConfig`] for an incomplete key pair.
    pub async fn build_client(&self) -> Result<Client, SecretError> {
        let static_credentials = self.static_credentials()?;

        tracing::debug!(
            credentials = if static_credentials.is_some() { "static" } else { "default-chain" },
            region = ?self.region,
            role_arn = ?self.role_arn,
            endpoint_url = ?self.endpoint_url,
            "Building Secrets Manager client"
        );

        let http_client = HttpClientBuilder::new()
            .tls_provider(tls::Provider::Rustls(tls::rustls_provider::CryptoMode::Ring))
            .build_https();

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).http_client(http_client);
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(credentials) = static_credentials {
            loader = loader.credentials_provider(credentials);
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_secretsmanager::config::Builder::from(&shared_config);
        if let Some(role_arn) = &self.role_arn {
            let provider = AssumeRoleProvider::builder(role_arn.clone())
                .session_name(ROLE_SESSION_NAME)
                .configure(&shared_config)
                .build()
                .await;
            builder = builder.credentials_provider(provider);
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Ok(Client::from_conf(builder.build()))
    }
}
