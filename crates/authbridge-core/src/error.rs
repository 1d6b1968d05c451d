//! Errors that can occur when configuring and constructing the SDK client

use thiserror::Error;

/// Errors reading or interpreting the host-provided configuration mapping.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A required setting is absent or empty.
    #[error("configuration is missing the `{0}` setting")]
    MissingSetting(&'static str),

    /// The configuration mapping does not deserialize into the expected
    /// shape.
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Cache-backed sessions were requested but no cache connection was
    /// provided to the service.
    #[error("`useCacheSessions` is enabled but no cache connection was provided")]
    CacheRequired,
}

/// Errors constructing the identity-provider client.
#[derive(Debug, Error)]
pub enum ClientConstructionError {
    /// The configuration could not be loaded or interpreted.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The configured domain is not a valid https origin.
    #[error("`{0}` is not a valid provider domain")]
    InvalidDomain(String),

    /// The HTTP transport could not be initialized.
    #[error("failed to initialize HTTP transport: {0}")]
    Transport(#[from] reqwest::Error),
}
