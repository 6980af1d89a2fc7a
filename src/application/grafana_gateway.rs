// Gateway trait for the remote dashboard service
use crate::domain::dashboard::{DashboardDocument, DashboardLookup};
use crate::domain::folder::{FolderId, FolderLookup};
use crate::error::DeployError;
use async_trait::async_trait;

#[async_trait]
pub trait GrafanaGateway: Send + Sync {
    /// Find a folder by its exact title
    async fn lookup_folder(&self, title: &str) -> Result<FolderLookup, DeployError>;

    /// Create a folder and return its id. Not idempotent: callers look up first.
    async fn create_folder(&self, title: &str) -> Result<FolderId, DeployError>;

    /// Fetch a dashboard by uid. A missing dashboard is `NotFound`, not an error.
    async fn fetch_dashboard(&self, uid: &str) -> Result<DashboardLookup, DeployError>;

    /// Create or overwrite the dashboard with the document's uid inside the folder
    async fn import_dashboard(
        &self,
        dashboard: &DashboardDocument,
        folder_id: FolderId,
    ) -> Result<(), DeployError>;
}
