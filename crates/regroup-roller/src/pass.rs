//! The replacement pass — a paginated staleness sweep over one group.
//!
//! The pass is sequential: page N+1 is never fetched before page N is fully
//! classified and the pause has elapsed. Results stream to the caller over a
//! bounded channel; the channel closing is the completion signal, on success
//! and on fatal error alike.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::{debug, info};

use regroup_core::{ControlPlane, GroupSettings, GroupSnapshot, ProviderError};

use crate::error::{RollerError, RollerResult};
use crate::freshness::is_fresh;
use crate::planner::effective_batch_size;

/// Events emitted by a pass, in the order they occur.
#[derive(Debug)]
pub enum RollEvent {
    /// The group is younger than the freshness threshold; nothing was done.
    SkippedFresh { group: String, age_secs: u64 },
    /// A stale instance was terminated.
    Terminated { instance_id: String },
    /// Terminating one instance failed; the pass continues.
    TerminateFailed {
        instance_id: String,
        error: ProviderError,
    },
    /// Fetching a page failed; the pass stops here. Terminal.
    Aborted { error: ProviderError },
}

/// Events that may queue before the producer waits for the consumer.
const EVENT_BUFFER: usize = 16;

/// Drives one replacement pass over a single autoscaling group.
pub struct Roller<P> {
    provider: Arc<P>,
    settings: GroupSettings,
}

impl<P: ControlPlane + 'static> Roller<P> {
    pub fn new(provider: Arc<P>, settings: GroupSettings) -> Self {
        Self { provider, settings }
    }

    /// Capture the snapshot this pass will judge staleness against.
    ///
    /// One describe call. A missing group or a group without a launch
    /// configuration is fatal; nothing has been terminated yet.
    pub async fn inspect(&self) -> RollerResult<GroupSnapshot> {
        let group = self.provider.describe_group(&self.settings.name).await?;
        let active_config_id = group
            .launch_configuration
            .ok_or_else(|| RollerError::NoActiveConfig(group.name.clone()))?;

        debug!(
            group = %group.name,
            active_config = %active_config_id,
            desired_capacity = group.desired_capacity,
            "captured group snapshot"
        );

        Ok(GroupSnapshot {
            name: group.name,
            active_config_id,
            created_at: group.created_at,
            desired_capacity: group.desired_capacity,
        })
    }

    /// Start one pass and return its event stream.
    ///
    /// Precondition failures are returned here, before anything is
    /// terminated. After that the pass runs on its own task and the
    /// receiver sees every outcome; the channel closes when the pass is
    /// done.
    pub async fn start(&self) -> RollerResult<mpsc::Receiver<RollEvent>> {
        let pause = self.settings.pause()?;
        let fresh_window = self.settings.fresh_window()?;
        let snapshot = self.inspect().await?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        let now = epoch_secs();
        if is_fresh(&snapshot, now, fresh_window) {
            debug!(group = %snapshot.name, "group is fresh, skipping the sweep");
            let _ = tx
                .send(RollEvent::SkippedFresh {
                    age_secs: now.saturating_sub(snapshot.created_at),
                    group: snapshot.name,
                })
                .await;
            return Ok(rx);
        }

        let page_size = effective_batch_size(
            self.settings.batch_size,
            self.settings.min_instances_in_service,
            snapshot.desired_capacity,
        );
        info!(
            group = %snapshot.name,
            active_config = %snapshot.active_config_id,
            page_size,
            pause_secs = pause.as_secs(),
            "replacement pass starting"
        );

        let provider = Arc::clone(&self.provider);
        tokio::spawn(async move {
            drive(provider, snapshot, page_size, pause, tx).await;
        });

        Ok(rx)
    }
}

/// The paginated sweep. Runs until the last page, a fetch failure, or the
/// receiver going away; dropping `tx` on return closes the stream.
async fn drive<P: ControlPlane>(
    provider: Arc<P>,
    snapshot: GroupSnapshot,
    page_size: u32,
    pause: Duration,
    tx: mpsc::Sender<RollEvent>,
) {
    let mut token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        pages += 1;
        let page = match provider
            .instance_page(&snapshot.name, page_size, token.take())
            .await
        {
            Ok(page) => page,
            Err(error) => {
                debug!(group = %snapshot.name, page = pages, "page fetch failed, stopping pass");
                let _ = tx.send(RollEvent::Aborted { error }).await;
                return;
            }
        };

        debug!(
            group = %snapshot.name,
            page = pages,
            records = page.records.len(),
            "page fetched"
        );

        for record in page.records {
            if !record.is_stale(&snapshot.active_config_id) {
                continue;
            }

            let event = match provider.terminate_instance(&record.instance_id, false).await {
                Ok(()) => {
                    debug!(instance_id = %record.instance_id, "terminated stale instance");
                    RollEvent::Terminated {
                        instance_id: record.instance_id,
                    }
                }
                Err(error) => RollEvent::TerminateFailed {
                    instance_id: record.instance_id,
                    error,
                },
            };

            if tx.send(event).await.is_err() {
                debug!(group = %snapshot.name, "event receiver dropped, stopping pass");
                return;
            }
        }

        match page.next_token {
            Some(next) => {
                token = Some(next);
                tokio::time::sleep(pause).await;
            }
            None => {
                info!(group = %snapshot.name, pages, "replacement pass complete");
                return;
            }
        }
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
