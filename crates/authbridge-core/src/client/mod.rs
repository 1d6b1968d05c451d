//! AuthBridge SDK client

#[allow(clippy::module_inception)]
mod client;
#[allow(missing_docs)]
pub mod configuration;
mod flags;
#[allow(missing_docs)]
pub mod internal;

pub use client::Client;
pub use configuration::{ConfigProvider, SdkConfiguration};
pub use flags::Flags;
