//! The `run` command — one replacement pass.
//!
//! This is the output sink: every non-fatal failure from the pass is
//! surfaced as its own warning, a fresh-group skip as a single
//! informational message, and a fetch failure as the command's error.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::{info, warn};

use regroup_aws::AwsControlPlane;
use regroup_core::{AwsSettings, GroupSettings, Settings};
use regroup_roller::{RollEvent, Roller};

/// Flag-level overrides applied on top of the settings file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub group: Option<String>,
    pub batch_size: Option<i64>,
    pub min_in_service: Option<u32>,
    pub pause_time: Option<String>,
    pub new_time: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
}

pub async fn run(config: Option<&Path>, overrides: Overrides) -> anyhow::Result<()> {
    let settings = resolve(config, overrides)?;

    let provider = Arc::new(AwsControlPlane::connect(&settings.aws).await?);
    let roller = Roller::new(provider, settings.group);

    let mut rx = roller.start().await?;

    let mut terminated = 0u32;
    let mut warnings = 0u32;
    let mut fatal = None;

    while let Some(event) = rx.recv().await {
        match event {
            RollEvent::SkippedFresh { group, age_secs } => {
                info!(group = %group, age_secs, "group appears to be new, skipping");
            }
            RollEvent::Terminated { instance_id } => {
                terminated += 1;
                info!(instance_id = %instance_id, "instance terminated");
            }
            RollEvent::TerminateFailed { instance_id, error } => {
                warnings += 1;
                warn!(instance_id = %instance_id, error = %error, "instance termination failed");
            }
            RollEvent::Aborted { error } => {
                fatal = Some(error);
            }
        }
    }

    if let Some(error) = fatal {
        bail!("pass aborted: {error}");
    }

    info!(terminated, warnings, "pass finished");
    Ok(())
}

/// Resolve the settings file and flag overrides into validated settings.
fn resolve(config: Option<&Path>, overrides: Overrides) -> anyhow::Result<Settings> {
    let mut settings = match config {
        Some(path) => {
            Settings::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => {
            let name = overrides
                .group
                .as_deref()
                .context("either --config or --group is required")?;
            Settings {
                group: GroupSettings::new(name),
                aws: AwsSettings::default(),
            }
        }
    };

    if let Some(group) = overrides.group {
        settings.group.name = group;
    }
    if let Some(batch_size) = overrides.batch_size {
        settings.group.batch_size = batch_size;
    }
    if let Some(min) = overrides.min_in_service {
        settings.group.min_instances_in_service = min;
    }
    if let Some(pause) = overrides.pause_time {
        settings.group.pause_time = pause;
    }
    if let Some(new_time) = overrides.new_time {
        settings.group.asg_new_time = new_time;
    }
    if let Some(region) = overrides.region {
        settings.aws.region = Some(region);
    }
    if let Some(profile) = overrides.profile {
        settings.aws.profile = Some(profile);
    }

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_alone_build_settings() {
        let overrides = Overrides {
            group: Some("web-asg".to_string()),
            batch_size: Some(3),
            ..Default::default()
        };

        let settings = resolve(None, overrides).unwrap();
        assert_eq!(settings.group.name, "web-asg");
        assert_eq!(settings.group.batch_size, 3);
        assert_eq!(settings.group.asg_new_time, "2m");
    }

    #[test]
    fn group_name_is_required_without_a_file() {
        assert!(resolve(None, Overrides::default()).is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[group]\nname = \"web-asg\"\nbatch_size = 4\n\n[aws]\nregion = \"us-east-1\""
        )
        .unwrap();

        let overrides = Overrides {
            batch_size: Some(8),
            region: Some("eu-west-1".to_string()),
            ..Default::default()
        };

        let settings = resolve(Some(file.path()), overrides).unwrap();
        assert_eq!(settings.group.name, "web-asg");
        assert_eq!(settings.group.batch_size, 8);
        assert_eq!(settings.aws.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn invalid_override_duration_is_rejected() {
        let overrides = Overrides {
            group: Some("web-asg".to_string()),
            pause_time: Some("whenever".to_string()),
            ..Default::default()
        };

        assert!(resolve(None, overrides).is_err());
    }
}
