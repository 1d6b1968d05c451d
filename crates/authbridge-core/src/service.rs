//! Lazy access to the configured SDK client.

use std::sync::{Arc, RwLock};

use authbridge_state::{CacheConnection, CacheStore, Session, SessionStore, Store, TieredStore};
use tracing::{debug, instrument};

use crate::{
    client::{Client, ConfigProvider, SdkConfiguration},
    error::{ClientConstructionError, ConfigurationError},
    state::AuthState,
    telemetry::HostEnvironment,
};

/// Service providing access to the identity-provider SDK.
///
/// Holds two independently memoized slots, the SDK configuration and the
/// client, each filled on first access and replaceable explicitly for
/// testing. Collaborators arrive by constructor injection: a configuration
/// source, the host session, and optionally a shared cache connection.
///
/// Nothing here retries or recovers; failures surface as
/// [`ConfigurationError`] or [`ClientConstructionError`] and propagate
/// unchanged.
pub struct AuthService {
    config_provider: Arc<dyn ConfigProvider>,
    session: Arc<dyn Session>,
    cache: Option<Arc<dyn CacheConnection>>,
    host: Option<HostEnvironment>,
    state: Arc<AuthState>,

    configuration: RwLock<Option<Arc<SdkConfiguration>>>,
    client: RwLock<Option<Client>>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Create a service over explicitly provided host collaborators.
    pub fn new(config_provider: Arc<dyn ConfigProvider>, session: Arc<dyn Session>) -> Self {
        Self {
            config_provider,
            session,
            cache: None,
            host: None,
            state: Arc::new(AuthState::default()),
            configuration: RwLock::new(None),
            client: RwLock::new(None),
        }
    }

    /// Attach a shared cache connection, enabling cache-backed session
    /// storage when the configuration asks for it.
    pub fn with_cache(mut self, cache: Arc<dyn CacheConnection>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Report the host framework identity in outgoing telemetry.
    pub fn with_host(mut self, host: HostEnvironment) -> Self {
        self.host = Some(host);
        self
    }

    /// The SDK configuration, built on first access and memoized.
    ///
    /// When `useCacheSessions` is enabled, session storage is composed as a
    /// two-tier store: values in the shared cache, the per-session index in
    /// the host session. Otherwise session storage lives entirely in the
    /// host session.
    #[instrument(err, skip_all)]
    pub fn configuration(&self) -> Result<Arc<SdkConfiguration>, ConfigurationError> {
        if let Some(configuration) = self
            .configuration
            .read()
            .expect("RwLock is not poisoned")
            .as_ref()
        {
            return Ok(configuration.clone());
        }

        let configuration = Arc::new(self.build_configuration()?);
        *self.configuration.write().expect("RwLock is not poisoned") =
            Some(configuration.clone());

        Ok(configuration)
    }

    /// Replace the memoized configuration.
    pub fn set_configuration(&self, configuration: SdkConfiguration) {
        *self.configuration.write().expect("RwLock is not poisoned") =
            Some(Arc::new(configuration));
    }

    /// The SDK client, built from the configuration on first access,
    /// telemetry-stamped, and memoized.
    #[instrument(err, skip_all)]
    pub fn client(&self) -> Result<Client, ClientConstructionError> {
        if let Some(client) = self.client.read().expect("RwLock is not poisoned").as_ref() {
            return Ok(client.clone());
        }

        let client = Client::new(self.configuration()?)?;
        self.stamp_telemetry(&client);
        *self.client.write().expect("RwLock is not poisoned") = Some(client.clone());

        Ok(client)
    }

    /// Replace the memoized client, re-stamping telemetry.
    pub fn set_client(&self, client: Client) {
        self.stamp_telemetry(&client);
        *self.client.write().expect("RwLock is not poisoned") = Some(client);
    }

    /// The request-scoped authentication state bag.
    pub fn state(&self) -> Arc<AuthState> {
        self.state.clone()
    }

    fn build_configuration(&self) -> Result<SdkConfiguration, ConfigurationError> {
        let raw = self.config_provider.load()?;
        let mut configuration = SdkConfiguration::from_value(raw)?;
        configuration.session_storage = Some(self.build_session_storage(&configuration)?);
        debug!(
            use_cache_sessions = configuration.use_cache_sessions,
            "built SDK configuration"
        );
        Ok(configuration)
    }

    fn build_session_storage(
        &self,
        configuration: &SdkConfiguration,
    ) -> Result<Arc<dyn Store>, ConfigurationError> {
        if configuration.use_cache_sessions {
            let cache = self.cache.clone().ok_or(ConfigurationError::CacheRequired)?;
            let public = Arc::new(CacheStore::new(cache, CacheStore::DEFAULT_PREFIX));
            let private = Arc::new(SessionStore::new(
                self.session.clone(),
                SessionStore::DEFAULT_PREFIX,
            ));
            return Ok(Arc::new(TieredStore::new(public, private)));
        }

        Ok(Arc::new(SessionStore::new(
            self.session.clone(),
            SessionStore::DEFAULT_PREFIX,
        )))
    }

    fn stamp_telemetry(&self, client: &Client) {
        if !client.configuration().flags.enable_telemetry {
            return;
        }
        let Some(host) = &self.host else {
            return;
        };

        let mut telemetry = client.internal.telemetry();
        telemetry.set_environment(host.clone());
        client.internal.set_telemetry(telemetry);
        debug!(host = %host.name, "stamped client telemetry");
    }
}
