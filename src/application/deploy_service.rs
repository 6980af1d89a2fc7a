// Deploy service - Runs validation and, unless this is a dry run, reconciliation
use crate::application::grafana_gateway::GrafanaGateway;
use crate::application::reconcile_service::ReconcileService;
use crate::application::validation_service::ValidationService;
use crate::domain::outcome::RunOutcome;
use crate::error::DeployError;
use crate::infrastructure::config::{GrafanaSettings, RunArgs};
use std::sync::Arc;

#[derive(Clone)]
pub struct DeployService {
    host: String,
    validation: ValidationService,
    reconcile: ReconcileService,
}

impl DeployService {
    pub fn new(settings: GrafanaSettings, gateway: Arc<dyn GrafanaGateway>) -> Self {
        Self {
            host: settings.host.clone(),
            validation: ValidationService::new(settings),
            reconcile: ReconcileService::new(gateway),
        }
    }

    pub async fn run(&self, args: &RunArgs) -> Result<RunOutcome, DeployError> {
        if args.dry_run {
            tracing::info!("Performing dry run");
        }

        let report = self.validation.check(&args.source_path).await?;
        if args.dry_run {
            tracing::info!("Dry run succeeded, nothing was deployed");
            return Ok(RunOutcome::DryRun(report));
        }

        tracing::info!("Running deployment against {} ...", self.host);
        let summary = self.reconcile.reconcile(&args.source_path).await?;
        tracing::info!("Run succeeded: {}", summary);

        Ok(RunOutcome::Deployed(summary))
    }
}
