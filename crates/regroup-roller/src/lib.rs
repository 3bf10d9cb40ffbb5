//! regroup-roller — one rolling-replacement pass over an autoscaling group.
//!
//! A pass captures the group's active launch configuration once, then sweeps
//! the group's instances page by page, terminating every instance whose
//! launch configuration no longer matches. The group's own capacity
//! management launches the replacements; this crate never adjusts desired
//! capacity.
//!
//! # Components
//!
//! - **`freshness`** — age gate that skips groups still being provisioned
//! - **`planner`** — effective page size from batch size and the
//!   minimum-in-service floor
//! - **`pass`** — the paginated sweep itself, streaming [`RollEvent`]s

pub mod error;
pub mod freshness;
pub mod pass;
pub mod planner;

pub use error::{RollerError, RollerResult};
pub use freshness::is_fresh;
pub use pass::{RollEvent, Roller};
pub use planner::effective_batch_size;
