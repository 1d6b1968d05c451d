use std::sync::{Arc, RwLock};

use authbridge_state::Store;

use super::internal::{HttpState, InternalClient};
use crate::{
    client::configuration::SdkConfiguration, error::ClientConstructionError, telemetry::Telemetry,
};

/// The main struct to interact with the identity provider.
#[derive(Debug, Clone)]
pub struct Client {
    // Important: the [`Client`] struct requires its `Clone` implementation
    // to return an owned reference to the same instance, so any mutable
    // state lives behind the Arc as part of [`InternalClient`].
    #[doc(hidden)]
    pub internal: Arc<InternalClient>,
}

impl Client {
    /// Create a client from an already-built configuration.
    ///
    /// The configuration's domain must be a bare host name; it is resolved
    /// against `https://` here. The transport starts out stamped with this
    /// package's identity only; the service adds the host environment when
    /// telemetry is enabled.
    pub fn new(configuration: Arc<SdkConfiguration>) -> Result<Self, ClientConstructionError> {
        let base_url = parse_domain(&configuration)?;
        let http = HttpState::new(Telemetry::default())?;

        Ok(Self {
            internal: Arc::new(InternalClient {
                configuration,
                base_url,
                http: RwLock::new(http),
            }),
        })
    }

    /// The configuration this client was constructed with.
    pub fn configuration(&self) -> &SdkConfiguration {
        &self.internal.configuration
    }

    /// Base URL of the provider tenant.
    pub fn base_url(&self) -> &reqwest::Url {
        &self.internal.base_url
    }

    /// The storage backend session state flows through, when one was
    /// injected.
    pub fn storage(&self) -> Option<Arc<dyn Store>> {
        self.internal.storage()
    }

    /// HTTP client whose default headers carry the telemetry identity.
    pub fn http_client(&self) -> reqwest::Client {
        self.internal.http_client()
    }
}

fn parse_domain(
    configuration: &SdkConfiguration,
) -> Result<reqwest::Url, ClientConstructionError> {
    let domain = &configuration.domain;
    if domain.is_empty() || domain.contains('/') || domain.contains("://") {
        return Err(ClientConstructionError::InvalidDomain(domain.clone()));
    }
    reqwest::Url::parse(&configuration.base_url())
        .map_err(|_| ClientConstructionError::InvalidDomain(domain.clone()))
}
