//! regroup.toml configuration parsing and validation.
//!
//! Settings come from a TOML file, CLI flags, or both (the CLI merges flag
//! overrides on top of file values). Everything is validated here, before
//! any control-plane call is made.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("{field}: invalid duration {value:?} (expected e.g. \"500ms\", \"30s\", \"5m\", \"2h\")")]
    InvalidDuration { field: &'static str, value: String },

    #[error("aws.access_key is set but aws.secret_key is not")]
    IncompleteCredentials,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level settings for one replacement pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub group: GroupSettings,
    #[serde(default)]
    pub aws: AwsSettings,
}

/// Which group to roll, and how aggressively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSettings {
    /// Name of the autoscaling group to manage.
    pub name: String,
    /// Maximum instances examined per page. Zero or negative means "use the
    /// group's desired capacity".
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,
    /// Instances expected to stay in service while old ones are replaced.
    #[serde(default)]
    pub min_instances_in_service: u32,
    /// Pause between instance pages (e.g. "30s").
    #[serde(default = "default_pause_time")]
    pub pause_time: String,
    /// Group age below which a pass will not act (e.g. "2m").
    #[serde(default = "default_new_time")]
    pub asg_new_time: String,
}

/// AWS client selection. Everything is optional; unset values defer to the
/// SDK's environment/profile chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub access_key: Option<String>,
    /// Required whenever `access_key` is set.
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
}

fn default_batch_size() -> i64 {
    1
}

fn default_pause_time() -> String {
    "0s".to_string()
}

fn default_new_time() -> String {
    "2m".to_string()
}

impl GroupSettings {
    /// Settings for `name` with every other field at its default.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            batch_size: default_batch_size(),
            min_instances_in_service: 0,
            pause_time: default_pause_time(),
            asg_new_time: default_new_time(),
        }
    }

    /// Pause between pages, parsed.
    pub fn pause(&self) -> Result<Duration, ConfigError> {
        parse_duration("group.pause_time", &self.pause_time)
    }

    /// Freshness threshold, parsed.
    pub fn fresh_window(&self) -> Result<Duration, ConfigError> {
        parse_duration("group.asg_new_time", &self.asg_new_time)
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Check everything the pass relies on before any API call is made.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group.name.trim().is_empty() {
            return Err(ConfigError::Missing("group.name"));
        }
        self.group.pause()?;
        self.group.fresh_window()?;
        if self.aws.access_key.is_some() && self.aws.secret_key.is_none() {
            return Err(ConfigError::IncompleteCredentials);
        }
        Ok(())
    }
}

/// Parse a duration string like "500ms", "30s", "5m", "2h".
///
/// The unit suffix is required; a bare number is rejected so that a value
/// like `pause_time = "30"` fails loudly instead of meaning something
/// surprising.
pub fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let s = value.trim();
    let invalid = || ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
    };

    let (digits, to_duration): (&str, fn(u64) -> Duration) =
        if let Some(n) = s.strip_suffix("ms") {
            (n, Duration::from_millis)
        } else if let Some(n) = s.strip_suffix('s') {
            (n, Duration::from_secs)
        } else if let Some(n) = s.strip_suffix('m') {
            (n, |m| Duration::from_secs(m * 60))
        } else if let Some(n) = s.strip_suffix('h') {
            (n, |h| Duration::from_secs(h * 3600))
        } else {
            return Err(invalid());
        };

    digits.parse::<u64>().map(to_duration).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal() -> Settings {
        Settings {
            group: GroupSettings::new("web-asg"),
            aws: AwsSettings::default(),
        }
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(
            parse_duration("t", "500ms").unwrap(),
            Duration::from_millis(500)
        );
        assert_eq!(parse_duration("t", "30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("t", "5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("t", "2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("t", "0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parse_duration_rejects_bad_input() {
        for bad in ["", "30", "-5s", "fast", "s", "1.5m"] {
            assert!(
                matches!(
                    parse_duration("t", bad),
                    Err(ConfigError::InvalidDuration { .. })
                ),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn defaults_match_schema() {
        let g = GroupSettings::new("web-asg");
        assert_eq!(g.batch_size, 1);
        assert_eq!(g.min_instances_in_service, 0);
        assert_eq!(g.pause().unwrap(), Duration::ZERO);
        assert_eq!(g.fresh_window().unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn minimal_toml_applies_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [group]
            name = "web-asg"
            "#,
        )
        .unwrap();
        settings.validate().unwrap();
        assert_eq!(settings.group.name, "web-asg");
        assert_eq!(settings.group.batch_size, 1);
        assert_eq!(settings.group.asg_new_time, "2m");
        assert!(settings.aws.region.is_none());
    }

    #[test]
    fn full_toml_round_trips() {
        let settings: Settings = toml::from_str(
            r#"
            [group]
            name = "web-asg"
            batch_size = 4
            min_instances_in_service = 2
            pause_time = "30s"
            asg_new_time = "10m"

            [aws]
            region = "eu-west-1"
            profile = "prod"
            "#,
        )
        .unwrap();
        settings.validate().unwrap();
        assert_eq!(settings.group.batch_size, 4);
        assert_eq!(settings.group.min_instances_in_service, 2);
        assert_eq!(settings.group.pause().unwrap(), Duration::from_secs(30));
        assert_eq!(settings.aws.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[group]\nname = \"web-asg\"\npause_time = \"1s\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.group.name, "web-asg");
        assert_eq!(settings.group.pause().unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn empty_group_name_rejected() {
        let mut settings = minimal();
        settings.group.name = "  ".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Missing("group.name"))
        ));
    }

    #[test]
    fn bad_duration_rejected_by_validate() {
        let mut settings = minimal();
        settings.group.pause_time = "soon".to_string();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidDuration { field, .. }) if field == "group.pause_time"
        ));
    }

    #[test]
    fn access_key_requires_secret_key() {
        let mut settings = minimal();
        settings.aws.access_key = Some("AKIAMOCK".to_string());
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::IncompleteCredentials)
        ));

        settings.aws.secret_key = Some("secret".to_string());
        settings.validate().unwrap();
    }
}
