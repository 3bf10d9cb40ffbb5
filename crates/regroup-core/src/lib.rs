//! regroup-core — configuration, domain types, and the control-plane seam.
//!
//! Everything the replacement pass shares: validated settings
//! ([`Settings`], [`GroupSettings`], [`AwsSettings`]), the domain types
//! captured from the control plane ([`GroupSnapshot`], [`InstanceRecord`],
//! [`InstancePage`]), and the [`ControlPlane`] trait the cloud adapter
//! implements.

pub mod config;
pub mod provider;
pub mod types;

pub use config::{AwsSettings, ConfigError, GroupSettings, Settings};
pub use provider::{ControlPlane, ProviderError, ProviderResult};
pub use types::*;
