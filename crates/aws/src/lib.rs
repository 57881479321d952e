//! AWS integration for secretsync
//!
//! This crate provides the AWS Secrets Manager provider:
//! - [`secrets`]: [`SecretsManager`], the [`SecretsProvider`] implementation
//! - [`client`]: the [`SecretsManagerApi`] seam over the SDK client
//! - [`session`]: [`SessionConfig`] for building an SDK client
//! - [`fake`]: an in-memory client for tests
//!
//! [`SecretsProvider`]: secretsync_secrets::SecretsProvider

pub mod client;
pub mod fake;
pub mod secrets;
pub mod session;

// Re-export main types for convenience
pub use client::{SecretValueRequest, SecretValueResponse, SecretsManagerApi};
pub use fake::FakeSecretsManagerClient;
pub use secrets::{DEFAULT_VERSION_STAGE, SecretsManager};
pub use session::SessionConfig;
