#![doc = include_str!("../README.md")]

pub mod client;
mod error;
pub mod service;
pub mod state;
pub mod telemetry;

pub use client::{Client, ConfigProvider, Flags, SdkConfiguration};
pub use error::{ClientConstructionError, ConfigurationError};
pub use service::AuthService;
pub use state::AuthState;
pub use telemetry::{HostEnvironment, SDK_PACKAGE, SDK_VERSION, Telemetry};
