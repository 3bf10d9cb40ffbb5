//! Freshness guard — is the group too new to touch?
//!
//! A group younger than the configured threshold is assumed to still be
//! provisioning its first instances, and a pass over it is skipped entirely.
//! This is a simple, possibly unreliable test; it is a time comparison only.

use std::time::Duration;

use regroup_core::GroupSnapshot;

/// True when the group is younger than `threshold` at time `now` (unix
/// seconds). Saturates at zero so a creation time in the future cannot wrap.
pub fn is_fresh(snapshot: &GroupSnapshot, now: u64, threshold: Duration) -> bool {
    now.saturating_sub(snapshot.created_at) < threshold.as_secs()
}
