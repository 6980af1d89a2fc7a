// Content normalization and diffing of remote vs repo dashboards
use crate::domain::dashboard::DashboardDocument;
use crate::error::DeployError;
use crate::infrastructure::source_tree;
use serde_json::Value;
use similar::{DiffTag, TextDiff};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffVerdict {
    Identical,
    Differs,
    /// The comparison could not be completed
    Unknown,
}

impl DiffVerdict {
    /// Unknown counts as changed: re-deploying is safer than skipping a changed dashboard
    pub fn has_changed(self) -> bool {
        !matches!(self, DiffVerdict::Identical)
    }
}

/// Where the normalized remote copy of a dashboard is materialized while it is compared.
/// Unique per folder and uid, and never the name of a file listed in the folder.
pub fn artifact_path(source_path: &Path, folder: &str, uid: &str, source_files: &[String]) -> PathBuf {
    let stem = uid.replace(['/', '\\'], "_");
    let listed = |name: &str| source_files.iter().any(|f| f == name);

    let mut name = format!("{}.json", stem);
    let mut attempt = 0;
    while listed(&name) {
        attempt += 1;
        name = if attempt == 1 {
            format!("{}.remote.json", stem)
        } else {
            format!("{}.remote-{}.json", stem, attempt)
        };
    }

    source_path.join(folder).join(name)
}

/// The materialized remote copy. Removed explicitly once compared; dropping it unremoved
/// (an early return) deletes it as well.
struct Artifact<'a> {
    path: &'a Path,
    removed: bool,
}

impl Artifact<'_> {
    async fn remove(mut self) -> Result<(), DeployError> {
        source_tree::remove_file(self.path).await?;
        self.removed = true;
        Ok(())
    }
}

impl Drop for Artifact<'_> {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        // blocking, but a single unlink on an error path
        if let Err(e) = std::fs::remove_file(self.path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Compare a dashboard fetched from grafana with the one in the repo.
///
/// The remote copy is stripped of `id` and `version`, written to `artifact_path` and
/// compared line by line against the repo copy, both rendered with sorted keys and
/// fixed indentation. Whitespace never counts as a difference. The artifact is gone
/// by the time this returns.
pub async fn diff_dashboards(
    remote: DashboardDocument,
    local: &DashboardDocument,
    artifact_path: &Path,
) -> Result<DiffVerdict, DeployError> {
    let normalized = canonical(&remote.without_server_fields().into_value());

    source_tree::remove_file(artifact_path).await?;
    let artifact = Artifact {
        path: artifact_path,
        removed: false,
    };
    source_tree::write_json_file(artifact_path, &normalized).await?;

    let verdict = compare_with_artifact(artifact_path, local).await;
    artifact.remove().await?;

    Ok(verdict)
}

async fn compare_with_artifact(artifact_path: &Path, local: &DashboardDocument) -> DiffVerdict {
    let remote_text = match tokio::fs::read_to_string(artifact_path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Could not read back {}: {}", artifact_path.display(), e);
            return DiffVerdict::Unknown;
        }
    };

    let local_text = match serde_json::to_string_pretty(&canonical(&local.clone().into_value())) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Could not render repo dashboard for diffing: {}", e);
            return DiffVerdict::Unknown;
        }
    };

    compare_texts(&remote_text, &local_text)
}

/// Line diff of two texts, ignoring all whitespace within lines
pub fn compare_texts(existing: &str, desired: &str) -> DiffVerdict {
    let existing = strip_whitespace(existing);
    let desired = strip_whitespace(desired);

    let diff = TextDiff::from_lines(existing.as_str(), desired.as_str());
    if diff.ops().iter().any(|op| op.tag() != DiffTag::Equal) {
        DiffVerdict::Differs
    } else {
        DiffVerdict::Identical
    }
}

fn strip_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rebuild objects with their keys in sorted order, at every depth
fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let mut entries: Vec<_> = fields.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonical(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}
