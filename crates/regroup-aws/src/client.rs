//! AWS Auto Scaling client.

use anyhow::Context;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_autoscaling::Client;
use aws_sdk_autoscaling::config::{Credentials, Region};
use aws_sdk_autoscaling::primitives::DateTime;
use tracing::debug;

use regroup_core::{
    AwsSettings, ControlPlane, GroupDescription, InstancePage, InstanceRecord, ProviderError,
    ProviderResult,
};

// DescribeAutoScalingInstances accepts 1..=50 records per call.
const MAX_RECORDS_FLOOR: u32 = 1;
const MAX_RECORDS_CEIL: u32 = 50;

/// [`ControlPlane`] implemented against AWS Auto Scaling.
pub struct AwsControlPlane {
    client: Client,
}

impl AwsControlPlane {
    /// Build a client from the given settings, deferring to the SDK's
    /// environment/profile chain for anything unset.
    pub async fn connect(settings: &AwsSettings) -> anyhow::Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(access_key) = &settings.access_key {
            let secret_key = settings
                .secret_key
                .clone()
                .context("aws.access_key is set but aws.secret_key is not")?;
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                settings.session_token.clone(),
                None,
                "static",
            ));
        }

        let config = loader.load().await;
        debug!(region = ?config.region(), "aws client configured");

        Ok(Self {
            client: Client::new(&config),
        })
    }
}

#[async_trait]
impl ControlPlane for AwsControlPlane {
    async fn describe_group(&self, name: &str) -> ProviderResult<GroupDescription> {
        let out = self
            .client
            .describe_auto_scaling_groups()
            .auto_scaling_group_names(name)
            .send()
            .await
            .map_err(api_err)?;

        let group = out
            .auto_scaling_groups()
            .first()
            .ok_or_else(|| ProviderError::GroupNotFound(name.to_string()))?;

        Ok(GroupDescription {
            name: group.auto_scaling_group_name().unwrap_or(name).to_string(),
            launch_configuration: group.launch_configuration_name().map(str::to_string),
            created_at: to_epoch(group.created_time()),
            desired_capacity: group.desired_capacity().unwrap_or(0).max(0) as u32,
        })
    }

    async fn instance_page(
        &self,
        group: &str,
        page_size: u32,
        token: Option<String>,
    ) -> ProviderResult<InstancePage> {
        let mut req = self
            .client
            .describe_auto_scaling_instances()
            .max_records(clamp_page_size(page_size));
        if let Some(token) = token {
            req = req.next_token(token);
        }

        let out = req.send().await.map_err(api_err)?;

        // The API enumerates instances account-wide; scope to the one group.
        let records: Vec<InstanceRecord> = out
            .auto_scaling_instances()
            .iter()
            .filter(|details| details.auto_scaling_group_name() == Some(group))
            .map(|details| InstanceRecord {
                instance_id: details.instance_id().unwrap_or_default().to_string(),
                config_id: details.launch_configuration_name().map(str::to_string),
            })
            .collect();

        debug!(group, records = records.len(), "instance page fetched");

        Ok(InstancePage {
            records,
            next_token: out.next_token().map(str::to_string),
        })
    }

    async fn terminate_instance(
        &self,
        instance_id: &str,
        decrement_capacity: bool,
    ) -> ProviderResult<()> {
        self.client
            .terminate_instance_in_auto_scaling_group()
            .instance_id(instance_id)
            .should_decrement_desired_capacity(decrement_capacity)
            .send()
            .await
            .map_err(api_err)?;

        debug!(instance_id, "termination requested");
        Ok(())
    }
}

fn api_err<E>(err: E) -> ProviderError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ProviderError::Api(err.into())
}

/// Clamp to the API's MaxRecords bounds.
fn clamp_page_size(page_size: u32) -> i32 {
    page_size.clamp(MAX_RECORDS_FLOOR, MAX_RECORDS_CEIL) as i32
}

fn to_epoch(created: Option<&DateTime>) -> u64 {
    created.map(|t| t.secs().max(0) as u64).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_clamps_to_api_bounds() {
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(1), 1);
        assert_eq!(clamp_page_size(20), 20);
        assert_eq!(clamp_page_size(500), 50);
    }

    #[test]
    fn epoch_conversion_handles_missing_and_pre_epoch_times() {
        assert_eq!(to_epoch(None), 0);
        assert_eq!(
            to_epoch(Some(&DateTime::from_secs(1_700_000_000))),
            1_700_000_000
        );
        assert_eq!(to_epoch(Some(&DateTime::from_secs(-1))), 0);
    }
}
