// Reconciliation outcomes
use super::folder::FolderId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardOutcome {
    Created,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderOutcome {
    Created,
    Existing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardReport {
    pub file: String,
    pub uid: String,
    pub outcome: DashboardOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderReport {
    pub title: String,
    pub folder_id: FolderId,
    pub outcome: FolderOutcome,
    pub dashboards: Vec<DashboardReport>,
}

impl FolderReport {
    #[cfg(test)]
    pub fn dashboard(&self, uid: &str) -> Option<&DashboardReport> {
        self.dashboards.iter().find(|d| d.uid == uid)
    }
}

/// What a deployment did, folder by folder. Only used for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub folders: Vec<FolderReport>,
}

impl RunSummary {
    pub fn new(mut folders: Vec<FolderReport>) -> Self {
        folders.sort_by(|a, b| a.title.cmp(&b.title));
        Self { folders }
    }

    #[cfg(test)]
    pub fn folder(&self, title: &str) -> Option<&FolderReport> {
        self.folders.iter().find(|f| f.title == title)
    }

    pub fn folders_with(&self, outcome: FolderOutcome) -> usize {
        self.folders.iter().filter(|f| f.outcome == outcome).count()
    }

    pub fn dashboards_with(&self, outcome: DashboardOutcome) -> usize {
        self.folders
            .iter()
            .flat_map(|f| &f.dashboards)
            .filter(|d| d.outcome == outcome)
            .count()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} folders ({} created), dashboards: {} created, {} updated, {} unchanged",
            self.folders.len(),
            self.folders_with(FolderOutcome::Created),
            self.dashboards_with(DashboardOutcome::Created),
            self.dashboards_with(DashboardOutcome::Updated),
            self.dashboards_with(DashboardOutcome::Unchanged),
        )
    }
}

/// Counts gathered by a successful validation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub folders: usize,
    pub dashboards: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Validation passed and nothing was sent to grafana
    DryRun(ValidationReport),
    Deployed(RunSummary),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard(uid: &str, outcome: DashboardOutcome) -> DashboardReport {
        DashboardReport {
            file: format!("{uid}.json"),
            uid: uid.to_string(),
            outcome,
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary::new(vec![
            FolderReport {
                title: "beta".to_string(),
                folder_id: 2,
                outcome: FolderOutcome::Existing,
                dashboards: vec![dashboard("b1", DashboardOutcome::Unchanged)],
            },
            FolderReport {
                title: "alpha".to_string(),
                folder_id: 1,
                outcome: FolderOutcome::Created,
                dashboards: vec![
                    dashboard("a1", DashboardOutcome::Created),
                    dashboard("a2", DashboardOutcome::Created),
                ],
            },
        ]);

        assert_eq!(summary.folders[0].title, "alpha");
        assert_eq!(summary.folders_with(FolderOutcome::Created), 1);
        assert_eq!(summary.dashboards_with(DashboardOutcome::Created), 2);
        assert_eq!(summary.dashboards_with(DashboardOutcome::Updated), 0);
        assert_eq!(
            summary.to_string(),
            "2 folders (1 created), dashboards: 2 created, 0 updated, 1 unchanged"
        );
    }
}
