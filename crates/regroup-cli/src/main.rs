//! regroup — rolling replacement of stale autoscaling-group instances.
//!
//! One pass per invocation: capture the group's active launch configuration,
//! skip if the group is brand new, then terminate every instance running an
//! older configuration, page by page, letting the group launch replacements.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "regroup",
    about = "Rolling replacement of stale instances in an AWS Auto Scaling Group",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one replacement pass against a group.
    ///
    /// Settings come from --config and/or the flags below; flags override
    /// file values.
    Run {
        /// Path to a regroup.toml settings file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Name of the autoscaling group to manage.
        #[arg(short, long)]
        group: Option<String>,

        /// Maximum instances examined per page; 0 means the group's desired
        /// capacity.
        #[arg(long)]
        batch_size: Option<i64>,

        /// Instances expected to stay in service during the pass.
        #[arg(long)]
        min_in_service: Option<u32>,

        /// Pause between pages (e.g. "30s").
        #[arg(long)]
        pause_time: Option<String>,

        /// Group age below which the pass will not act (e.g. "2m").
        #[arg(long)]
        new_time: Option<String>,

        /// AWS region override.
        #[arg(long)]
        region: Option<String>,

        /// AWS shared-config profile.
        #[arg(long)]
        profile: Option<String>,

        /// Emit logs as JSON lines.
        #[arg(long)]
        log_json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            group,
            batch_size,
            min_in_service,
            pause_time,
            new_time,
            region,
            profile,
            log_json,
        } => {
            init_tracing(log_json);
            let overrides = commands::run::Overrides {
                group,
                batch_size,
                min_in_service,
                pause_time,
                new_time,
                region,
                profile,
            };
            commands::run::run(config.as_deref(), overrides).await
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".parse().unwrap());
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
