// Grafana HTTP API implementation of the gateway
use crate::application::grafana_gateway::GrafanaGateway;
use crate::domain::dashboard::{DashboardDocument, DashboardLookup};
use crate::domain::folder::{find_by_title, FolderId, FolderLookup, RemoteFolder};
use crate::error::DeployError;
use crate::infrastructure::config::GrafanaSettings;
use async_trait::async_trait;
use reqwest::{header, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct GrafanaClient {
    base_url: String,
    authorization: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DashboardEnvelope {
    dashboard: DashboardDocument,
}

#[derive(Debug, Serialize)]
struct CreateFolderRequest<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportDashboardRequest<'a> {
    dashboard: &'a DashboardDocument,
    overwrite: bool,
    folder_id: FolderId,
}

impl GrafanaClient {
    pub fn new(settings: &GrafanaSettings) -> Self {
        Self {
            base_url: settings.base_url(),
            authorization: settings.authorization.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        tracing::debug!("GET {}", path);
        self.client
            .get(format!("{}{}", self.base_url, path))
            .basic_auth("", Some(&self.authorization))
            .header(header::ACCEPT, "application/json")
    }

    fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> RequestBuilder {
        tracing::debug!("POST {}", path);
        self.client
            .post(format!("{}{}", self.base_url, path))
            .basic_auth("", Some(&self.authorization))
            .header(header::ACCEPT, "application/json")
            .json(body)
    }

    /// Anything but a 2xx becomes a `Remote` error carrying the status and body
    async fn ensure_success(
        operation: &'static str,
        response: Response,
    ) -> Result<Response, DeployError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeployError::Remote {
            operation,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl GrafanaGateway for GrafanaClient {
    async fn lookup_folder(&self, title: &str) -> Result<FolderLookup, DeployError> {
        let response = self.get("/api/folders").send().await?;
        let folders: Vec<RemoteFolder> = Self::ensure_success("get folders", response)
            .await?
            .json()
            .await?;

        Ok(find_by_title(&folders, title))
    }

    async fn create_folder(&self, title: &str) -> Result<FolderId, DeployError> {
        let response = self
            .post("/api/folders", &CreateFolderRequest { title })
            .send()
            .await?;
        let folder: RemoteFolder = Self::ensure_success("create folder", response)
            .await?
            .json()
            .await?;

        tracing::debug!(
            "Created folder {:?} with id {} (uid {})",
            folder.title,
            folder.id,
            folder.uid.as_deref().unwrap_or("-")
        );
        Ok(folder.id)
    }

    async fn fetch_dashboard(&self, uid: &str) -> Result<DashboardLookup, DeployError> {
        let path = format!("/api/dashboards/uid/{}", urlencoding::encode(uid));
        let response = self.get(&path).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(DashboardLookup::NotFound);
        }

        let envelope: DashboardEnvelope = Self::ensure_success("get dashboard", response)
            .await?
            .json()
            .await?;

        Ok(DashboardLookup::Found(envelope.dashboard))
    }

    async fn import_dashboard(
        &self,
        dashboard: &DashboardDocument,
        folder_id: FolderId,
    ) -> Result<(), DeployError> {
        let request = ImportDashboardRequest {
            dashboard,
            overwrite: true,
            folder_id,
        };
        let response = self.post("/api/dashboards/import", &request).send().await?;
        Self::ensure_success("import dashboard", response).await?;

        Ok(())
    }
}
