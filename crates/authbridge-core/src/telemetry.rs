//! Telemetry identity attached to outgoing SDK requests.

use reqwest::header::{self, HeaderMap, HeaderValue};

/// This package's name, reported in outgoing telemetry.
pub const SDK_PACKAGE: &str = env!("CARGO_PKG_NAME");

/// This package's version, reported in outgoing telemetry.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The host environment the SDK runs inside, reported as a telemetry
/// property alongside the package identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    /// Framework or platform name, e.g. `axum`.
    pub name: String,
    /// Framework or platform version.
    pub version: String,
}

/// Caller-identifying metadata stamped onto every outgoing SDK request.
///
/// Rendered into the transport's default headers: a composite `User-Agent`,
/// an `AuthBridge-Package` header, and, when a host environment is set, an
/// `AuthBridge-Env` header. Fire-and-forget: nothing downstream acknowledges
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telemetry {
    package_name: String,
    package_version: String,
    environment: Option<HostEnvironment>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            package_name: SDK_PACKAGE.to_owned(),
            package_version: SDK_VERSION.to_owned(),
            environment: None,
        }
    }
}

impl Telemetry {
    /// Set the environment property reported alongside the package identity.
    pub fn set_environment(&mut self, environment: HostEnvironment) {
        self.environment = Some(environment);
    }

    /// Override the reported package identity.
    pub fn set_package(&mut self, name: &str, version: &str) {
        self.package_name = name.to_owned();
        self.package_version = version.to_owned();
    }

    /// The composite user agent for outgoing requests.
    pub fn user_agent(&self) -> String {
        match &self.environment {
            Some(environment) => format!(
                "{}/{} ({}/{})",
                self.package_name, self.package_version, environment.name, environment.version
            ),
            None => format!("{}/{}", self.package_name, self.package_version),
        }
    }

    /// Default headers carrying the telemetry identity.
    pub(crate) fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.append(
            header::USER_AGENT,
            HeaderValue::from_str(&self.user_agent())
                .expect("User agent should be a valid header value"),
        );

        headers.append(
            "AuthBridge-Package",
            HeaderValue::from_str(&format!("{}/{}", self.package_name, self.package_version))
                .expect("Package identity should be a valid header value"),
        );

        if let Some(environment) = &self.environment {
            headers.append(
                "AuthBridge-Env",
                HeaderValue::from_str(&format!("{}/{}", environment.name, environment.version))
                    .expect("Host environment should be a valid header value"),
            );
        }

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_without_environment() {
        let telemetry = Telemetry::default();
        assert_eq!(
            telemetry.user_agent(),
            format!("{SDK_PACKAGE}/{SDK_VERSION}")
        );
    }

    #[test]
    fn test_user_agent_with_environment() {
        let mut telemetry = Telemetry::default();
        telemetry.set_environment(HostEnvironment {
            name: "axum".to_owned(),
            version: "0.7.9".to_owned(),
        });
        assert_eq!(
            telemetry.user_agent(),
            format!("{SDK_PACKAGE}/{SDK_VERSION} (axum/0.7.9)")
        );
    }

    #[test]
    fn test_headers_carry_package_and_environment() {
        let mut telemetry = Telemetry::default();
        telemetry.set_environment(HostEnvironment {
            name: "axum".to_owned(),
            version: "0.7.9".to_owned(),
        });

        let headers = telemetry.headers();
        assert!(headers.contains_key("AuthBridge-Package"));
        assert_eq!(
            headers.get("AuthBridge-Env").map(|value| value.as_bytes()),
            Some("axum/0.7.9".as_bytes())
        );
    }

    #[test]
    fn test_set_package_overrides_identity() {
        let mut telemetry = Telemetry::default();
        telemetry.set_package("custom-wrapper", "2.0.0");
        assert_eq!(telemetry.user_agent(), "custom-wrapper/2.0.0");
    }
}
