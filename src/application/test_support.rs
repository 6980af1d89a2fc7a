// In-memory grafana and source tree helpers for service tests
use crate::application::grafana_gateway::GrafanaGateway;
use crate::domain::dashboard::{DashboardDocument, DashboardLookup};
use crate::domain::folder::{find_by_title, FolderId, FolderLookup, RemoteFolder};
use crate::error::DeployError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LookupFolder(String),
    CreateFolder(String),
    FetchDashboard(String),
    ImportDashboard { uid: String, folder_id: FolderId },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::CreateFolder(_) | Call::ImportDashboard { .. })
    }
}

#[derive(Default)]
struct FakeState {
    folders: Vec<RemoteFolder>,
    dashboards: HashMap<String, (DashboardDocument, FolderId)>,
    failing_fetches: HashMap<String, u16>,
    next_id: i64,
    calls: Vec<Call>,
}

/// Behaves like grafana for the calls the reconciler makes: it assigns ids on create
/// and injects `id` and `version` into every dashboard it stores.
#[derive(Default)]
pub struct FakeGrafana {
    state: Mutex<FakeState>,
}

impl FakeGrafana {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(self, id: FolderId, title: &str) -> Self {
        self.state.lock().unwrap().folders.push(RemoteFolder {
            id,
            title: title.to_string(),
            uid: None,
        });
        self
    }

    /// Stores a dashboard as grafana would return it, `id` and `version` included
    pub fn with_dashboard(self, dashboard: Value, folder_id: FolderId) -> Self {
        let dashboard = DashboardDocument::try_from(dashboard).unwrap();
        let uid = dashboard.uid().unwrap().to_string();
        self.state
            .lock()
            .unwrap()
            .dashboards
            .insert(uid, (dashboard, folder_id));
        self
    }

    pub fn failing_fetch(self, uid: &str, status: u16) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_fetches
            .insert(uid.to_string(), status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn stored(&self, uid: &str) -> Option<(Value, FolderId)> {
        self.state
            .lock()
            .unwrap()
            .dashboards
            .get(uid)
            .map(|(d, folder_id)| (d.clone().into_value(), *folder_id))
    }
}

#[async_trait]
impl GrafanaGateway for FakeGrafana {
    async fn lookup_folder(&self, title: &str) -> Result<FolderLookup, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::LookupFolder(title.to_string()));
        Ok(find_by_title(&state.folders, title))
    }

    async fn create_folder(&self, title: &str) -> Result<FolderId, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateFolder(title.to_string()));
        state.next_id += 1;
        let id = 1000 + state.next_id;
        state.folders.push(RemoteFolder {
            id,
            title: title.to_string(),
            uid: None,
        });
        Ok(id)
    }

    async fn fetch_dashboard(&self, uid: &str) -> Result<DashboardLookup, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::FetchDashboard(uid.to_string()));
        if let Some(status) = state.failing_fetches.get(uid) {
            return Err(DeployError::Remote {
                operation: "get dashboard",
                status: *status,
                body: "fake failure".to_string(),
            });
        }
        Ok(match state.dashboards.get(uid) {
            Some((dashboard, _)) => DashboardLookup::Found(dashboard.clone()),
            None => DashboardLookup::NotFound,
        })
    }

    async fn import_dashboard(
        &self,
        dashboard: &DashboardDocument,
        folder_id: FolderId,
    ) -> Result<(), DeployError> {
        let mut state = self.state.lock().unwrap();
        let uid = dashboard.uid().unwrap_or_default().to_string();
        state.calls.push(Call::ImportDashboard {
            uid: uid.clone(),
            folder_id,
        });

        let version = state
            .dashboards
            .get(&uid)
            .and_then(|(d, _)| d.fields().get("version").and_then(Value::as_i64))
            .unwrap_or(0);
        let mut fields = dashboard.fields().clone();
        fields.insert("id".to_string(), json!(500 + state.dashboards.len()));
        fields.insert("version".to_string(), json!(version + 1));
        state
            .dashboards
            .insert(uid, (DashboardDocument::new(fields), folder_id));
        Ok(())
    }
}

/// Writes `(folder, file, content)` entries under `root`, creating folders as needed
pub fn write_tree(root: &Path, entries: &[(&str, &str, Value)]) {
    for (folder, file, content) in entries {
        let dir = root.join(folder);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), serde_json::to_vec_pretty(content).unwrap()).unwrap();
    }
}
