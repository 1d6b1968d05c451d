use std::sync::Arc;

use authbridge_state::Store;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{client::flags::Flags, error::ConfigurationError};

/// Source of the raw configuration mapping, provided by the host application.
///
/// Replaces lookup through a process-wide service registry: hosts construct
/// an [`AuthService`](crate::AuthService) with whichever provider fits their
/// configuration system. The mapping is consumed once per facade lifetime.
pub trait ConfigProvider: Send + Sync {
    /// Produce the raw configuration mapping.
    fn load(&self) -> Result<serde_json::Value, ConfigurationError>;
}

impl ConfigProvider for serde_json::Value {
    fn load(&self) -> Result<serde_json::Value, ConfigurationError> {
        Ok(self.clone())
    }
}

/// Settings for the identity-provider client. Read once from the host
/// configuration at first use and uneditable once the client is initialized.
#[derive(Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SdkConfiguration {
    /// The identity provider tenant domain, e.g. `tenant.eu.example.com`.
    pub domain: String,

    /// OAuth client identifier issued by the provider.
    pub client_id: String,

    /// OAuth client secret, when the application is confidential.
    pub client_secret: Option<String>,

    /// API audience to request tokens for.
    pub audience: Option<String>,

    /// Keep SDK session state in the shared cache instead of the host
    /// session.
    pub use_cache_sessions: bool,

    /// Feature flags.
    pub flags: Flags,

    /// Settings passed through to the SDK untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,

    /// The storage backend session state is persisted through. Populated by
    /// the service, never by the configuration mapping.
    #[serde(skip)]
    #[schemars(skip)]
    pub session_storage: Option<Arc<dyn Store>>,
}

impl SdkConfiguration {
    /// Deserialize a raw configuration mapping, validating required
    /// settings.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, ConfigurationError> {
        let configuration: Self = serde_json::from_value(raw)?;
        if configuration.domain.is_empty() {
            return Err(ConfigurationError::MissingSetting("domain"));
        }
        if configuration.client_id.is_empty() {
            return Err(ConfigurationError::MissingSetting("clientId"));
        }
        Ok(configuration)
    }

    /// Base URL of the provider tenant.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.domain)
    }
}

impl std::fmt::Debug for SdkConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfiguration")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("audience", &self.audience)
            .field("use_cache_sessions", &self.use_cache_sessions)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
