// Reconcile service - Brings grafana in line with the dashboards in the source tree
use crate::application::grafana_gateway::GrafanaGateway;
use crate::domain::dashboard::{DashboardDocument, DashboardLookup};
use crate::domain::folder::{FolderId, FolderLookup};
use crate::domain::outcome::{DashboardOutcome, DashboardReport, FolderOutcome, FolderReport, RunSummary};
use crate::error::DeployError;
use crate::infrastructure::{dashboard_diff, source_tree};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Clone)]
pub struct ReconcileService {
    gateway: Arc<dyn GrafanaGateway>,
}

impl ReconcileService {
    pub fn new(gateway: Arc<dyn GrafanaGateway>) -> Self {
        Self { gateway }
    }

    /// Deploys every folder concurrently. Every folder is allowed to finish before the
    /// first failure (in completion order) is returned.
    pub async fn reconcile(&self, source_path: &Path) -> Result<RunSummary, DeployError> {
        let folders = source_tree::list_folders(source_path).await?;

        let mut tasks = JoinSet::new();
        for folder in folders {
            let service = self.clone();
            let source_path = source_path.to_path_buf();
            tasks.spawn(async move { service.deploy_folder(source_path, folder).await });
        }

        let mut reports = Vec::new();
        let mut failure = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined
                .map_err(|e| DeployError::InvariantViolation(format!("folder task did not complete: {e}")))
                .and_then(|r| r);
            match result {
                Ok(report) => reports.push(report),
                Err(e) => keep_first(&mut failure, e),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(RunSummary::new(reports)),
        }
    }

    async fn deploy_folder(&self, source_path: PathBuf, folder: String) -> Result<FolderReport, DeployError> {
        tracing::info!("Deploying folder {}", folder);

        // the folder id must be known before any of its dashboards are touched
        let (folder_id, outcome) = match self.gateway.lookup_folder(&folder).await? {
            FolderLookup::Found(id) => {
                tracing::info!("Folder {} exists in grafana", folder);
                (id, FolderOutcome::Existing)
            }
            FolderLookup::NotFound => {
                tracing::info!("Creating folder {} in grafana", folder);
                (self.gateway.create_folder(&folder).await?, FolderOutcome::Created)
            }
        };

        let files = source_tree::list_folder_files(&source_path, &folder).await?;
        let mut pending = Vec::with_capacity(files.len());
        for file in &files {
            pending.push(self.deploy_dashboard(&source_path, &folder, folder_id, file, &files));
        }
        let results = join_all(pending).await;

        let mut dashboards = Vec::with_capacity(results.len());
        let mut failure = None;
        for result in results {
            match result {
                Ok(report) => dashboards.push(report),
                Err(e) => keep_first(&mut failure, e),
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        Ok(FolderReport {
            title: folder,
            folder_id,
            outcome,
            dashboards,
        })
    }

    async fn deploy_dashboard(
        &self,
        source_path: &Path,
        folder: &str,
        folder_id: FolderId,
        file: &str,
        source_files: &[String],
    ) -> Result<DashboardReport, DeployError> {
        tracing::info!("Deploying dashboard {}/{}", folder, file);
        let dashboard_path = source_path.join(folder).join(file);

        let local = source_tree::read_json_file(&dashboard_path).await?;
        let local = DashboardDocument::try_from(local).map_err(|_| {
            DeployError::InvariantViolation(format!(
                "{} is no longer a JSON object; the source tree changed after validation",
                dashboard_path.display()
            ))
        })?;
        let uid = local
            .uid()
            .ok_or_else(|| {
                DeployError::InvariantViolation(format!(
                    "{} has no uid; the source tree changed after validation",
                    dashboard_path.display()
                ))
            })?
            .to_string();

        let outcome = match self.gateway.fetch_dashboard(&uid).await? {
            DashboardLookup::NotFound => {
                tracing::info!("Creating dashboard {} in grafana", uid);
                self.gateway.import_dashboard(&local, folder_id).await?;
                DashboardOutcome::Created
            }
            DashboardLookup::Found(remote) => {
                let artifact = dashboard_diff::artifact_path(source_path, folder, &uid, source_files);
                let verdict = dashboard_diff::diff_dashboards(remote, &local, &artifact).await?;
                if verdict == dashboard_diff::DiffVerdict::Unknown {
                    tracing::warn!("Could not diff dashboard {}, deploying it anyway", uid);
                }

                if verdict.has_changed() {
                    tracing::info!("Updating dashboard {} in grafana", uid);
                    self.gateway.import_dashboard(&local, folder_id).await?;
                    DashboardOutcome::Updated
                } else {
                    tracing::info!("Dashboard {} is unchanged", uid);
                    DashboardOutcome::Unchanged
                }
            }
        };

        Ok(DashboardReport {
            file: file.to_string(),
            uid,
            outcome,
        })
    }
}

/// Keeps the first failure to surface it once everything has drained; later ones are only logged
fn keep_first(failure: &mut Option<DeployError>, error: DeployError) {
    if failure.is_none() {
        *failure = Some(error);
    } else {
        tracing::error!("Additional failure: {}", error);
    }
}
