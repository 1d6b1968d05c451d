use std::sync::{Arc, RwLock};

use authbridge_state::Store;

use crate::{client::configuration::SdkConfiguration, telemetry::Telemetry};

/// HTTP transport plus the telemetry identity baked into its default
/// headers. Replaced wholesale when the identity changes.
pub(crate) struct HttpState {
    pub(crate) telemetry: Telemetry,
    pub(crate) client: reqwest::Client,
}

impl HttpState {
    pub(crate) fn new(telemetry: Telemetry) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .default_headers(telemetry.headers())
            .build()?;
        Ok(Self { telemetry, client })
    }
}

#[allow(missing_docs)]
pub struct InternalClient {
    pub(crate) configuration: Arc<SdkConfiguration>,
    pub(crate) base_url: reqwest::Url,

    /// Use Client::http_client() to access this. Rebuilt when the telemetry
    /// identity changes.
    pub(crate) http: RwLock<HttpState>,
}

impl std::fmt::Debug for InternalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternalClient")
            .field("configuration", &self.configuration)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl InternalClient {
    /// The telemetry identity currently stamped on outgoing requests.
    pub fn telemetry(&self) -> Telemetry {
        self.http
            .read()
            .expect("RwLock is not poisoned")
            .telemetry
            .clone()
    }

    /// Replace the telemetry identity, rebuilding the transport so its
    /// default headers carry the new value.
    pub fn set_telemetry(&self, telemetry: Telemetry) {
        let http = HttpState::new(telemetry).expect("HTTP client build should not fail");
        *self.http.write().expect("RwLock is not poisoned") = http;
    }

    /// HTTP client whose default headers carry the telemetry identity.
    pub fn http_client(&self) -> reqwest::Client {
        self.http
            .read()
            .expect("RwLock is not poisoned")
            .client
            .clone()
    }

    /// The storage backend session state flows through, when one was
    /// injected into the configuration.
    pub fn storage(&self) -> Option<Arc<dyn Store>> {
        self.configuration.session_storage.clone()
    }
}
