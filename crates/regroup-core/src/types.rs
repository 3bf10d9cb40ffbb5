//! Domain types for a replacement pass.

/// Immutable view of the group, captured once at the start of a pass.
///
/// The active configuration identifier is fixed here and never re-read
/// mid-pass, even though terminations change group membership concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSnapshot {
    pub name: String,
    /// Identifier of the currently-active launch configuration; the sole
    /// staleness criterion for the whole pass.
    pub active_config_id: String,
    /// Unix timestamp (seconds) when the group was created.
    pub created_at: u64,
    pub desired_capacity: u32,
}

/// Raw describe result at the control-plane boundary.
///
/// The launch configuration is optional here — a group may be driven by a
/// different template mechanism entirely. [`GroupSnapshot`] requires it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDescription {
    pub name: String,
    pub launch_configuration: Option<String>,
    /// Unix timestamp (seconds) when the group was created.
    pub created_at: u64,
    pub desired_capacity: u32,
}

/// One instance as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub instance_id: String,
    /// Absent when the launch configuration the instance was started from
    /// has since been deleted. Absence is a staleness signal, not an error.
    pub config_id: Option<String>,
}

impl InstanceRecord {
    /// Whether this instance should be replaced, judged against the active
    /// launch configuration identifier.
    pub fn is_stale(&self, active_config_id: &str) -> bool {
        self.config_id.as_deref() != Some(active_config_id)
    }
}

/// One page of instance records plus the continuation token, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePage {
    pub records: Vec<InstanceRecord>,
    /// Present when more pages remain; its absence ends the pass.
    pub next_token: Option<String>,
}
