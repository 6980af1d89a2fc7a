// Validation service - Checks that a deployment can go ahead before anything is sent to grafana
use crate::domain::dashboard::{DashboardDocument, DocumentProblem, Violation};
use crate::domain::outcome::ValidationReport;
use crate::error::{DeployError, StructureProblem};
use crate::infrastructure::config::{GrafanaSettings, AUTHORIZATION_VARIABLE, HOST_VARIABLE};
use crate::infrastructure::source_tree;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ValidationService {
    settings: GrafanaSettings,
}

impl ValidationService {
    pub fn new(settings: GrafanaSettings) -> Self {
        Self { settings }
    }

    /// Runs every check in order: settings, source path, tree structure, then each dashboard.
    /// Dashboard problems are collected across the whole tree before failing.
    pub async fn check(&self, source_path: &Path) -> Result<ValidationReport, DeployError> {
        tracing::info!("Running checks against {} ...", source_path.display());

        if self.settings.authorization.trim().is_empty() {
            return Err(DeployError::Configuration {
                variable: AUTHORIZATION_VARIABLE,
            });
        }
        if self.settings.host.trim().is_empty() {
            return Err(DeployError::Configuration {
                variable: HOST_VARIABLE,
            });
        }

        if !source_tree::path_exists(source_path).await {
            return Err(DeployError::Path {
                path: source_path.to_path_buf(),
            });
        }

        let report = self.check_dashboards(source_path).await?;

        tracing::info!(
            "All checks passed ({} folders, {} dashboards)",
            report.folders,
            report.dashboards
        );
        Ok(report)
    }

    async fn check_dashboards(&self, source_path: &Path) -> Result<ValidationReport, DeployError> {
        let folders = source_tree::list_folders(source_path).await?;

        let mut empty_folders = Vec::new();
        let mut violations = Vec::new();
        let mut dashboards = 0;

        for folder in &folders {
            tracing::info!("Checking folder {}", folder);
            let files = source_tree::list_folder_files(source_path, folder).await?;
            if files.is_empty() {
                empty_folders.push(folder.clone());
            }

            for file in files {
                tracing::debug!("Checking dashboard {}/{}", folder, file);
                dashboards += 1;
                let path = source_path.join(folder).join(&file);
                for problem in Self::document_problems(&path).await? {
                    let violation = Violation {
                        folder: folder.clone(),
                        file: file.clone(),
                        problem,
                    };
                    tracing::error!("{}", violation);
                    violations.push(violation);
                }
            }
        }

        if folders.is_empty() {
            return Err(StructureProblem::NoFolders.into());
        }
        if !empty_folders.is_empty() {
            return Err(StructureProblem::EmptyFolders(empty_folders).into());
        }
        if !violations.is_empty() {
            return Err(DeployError::Validation { violations });
        }

        Ok(ValidationReport {
            folders: folders.len(),
            dashboards,
        })
    }

    async fn document_problems(path: &Path) -> Result<Vec<DocumentProblem>, DeployError> {
        let value = match source_tree::read_json_file(path).await {
            Ok(value) => value,
            Err(DeployError::Json { source, .. }) => {
                return Ok(vec![DocumentProblem::Unparseable(source.to_string())]);
            }
            Err(e) => return Err(e),
        };

        Ok(match DashboardDocument::try_from(value) {
            Ok(dashboard) => dashboard.problems(),
            Err(_) => vec![DocumentProblem::NotAnObject],
        })
    }
}
