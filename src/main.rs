// Main entry point - Argument resolution, dependency wiring and exit status
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::application::deploy_service::DeployService;
use crate::infrastructure::config::{
    is_automation, load_grafana_settings, run_args_from_action_inputs,
};
use crate::infrastructure::grafana_client::GrafanaClient;
use crate::presentation::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The only place a failure turns into a process exit
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Run failed due to {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let env = |name: &str| std::env::var(name).ok();

    // Inside a workflow the arguments come from step inputs instead of the command line
    let args = if is_automation(env) {
        run_args_from_action_inputs(env)
    } else {
        Cli::parse().into_run_args()
    };

    let settings = load_grafana_settings()?;
    let gateway = Arc::new(GrafanaClient::new(&settings));
    let service = DeployService::new(settings, gateway);

    service
        .run(&args)
        .await
        .with_context(|| format!("deployment of {} failed", args.source_path.display()))?;

    Ok(())
}
