//! The cloud control-plane seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{GroupDescription, InstancePage};

/// Result type alias for control-plane operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by a control-plane implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The named group does not exist.
    #[error("autoscaling group not found: {0}")]
    GroupNotFound(String),

    /// The control plane rejected or failed the request.
    #[error("control plane request failed: {0}")]
    Api(#[from] anyhow::Error),
}

/// Narrow interface to the cloud autoscaling control plane.
///
/// Implementations own authentication, transport, and their own timeout or
/// retry policy; callers here never retry.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Describe a group by name. Zero matches is [`ProviderError::GroupNotFound`],
    /// not an empty value.
    async fn describe_group(&self, name: &str) -> ProviderResult<GroupDescription>;

    /// Fetch up to `page_size` instance records for `group`, continuing from
    /// `token` when present.
    async fn instance_page(
        &self,
        group: &str,
        page_size: u32,
        token: Option<String>,
    ) -> ProviderResult<InstancePage>;

    /// Terminate one instance. With `decrement_capacity` false the group's
    /// desired capacity is left untouched, so the group launches a
    /// replacement.
    async fn terminate_instance(
        &self,
        instance_id: &str,
        decrement_capacity: bool,
    ) -> ProviderResult<()>;
}
