// Filesystem access for the dashboard source tree
use crate::error::{io_err, json_err, DeployError};
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;

pub async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Names of the directories directly under the source path, sorted
pub async fn list_folders(source_path: &Path) -> Result<Vec<String>, DeployError> {
    list_entries(source_path, |file_type| file_type.is_dir()).await
}

/// Names of the regular files in one folder of the source path, sorted
pub async fn list_folder_files(source_path: &Path, folder: &str) -> Result<Vec<String>, DeployError> {
    list_entries(&source_path.join(folder), |file_type| file_type.is_file()).await
}

async fn list_entries(
    dir: &Path,
    keep: impl Fn(&std::fs::FileType) -> bool,
) -> Result<Vec<String>, DeployError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| io_err(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| io_err(dir, e))? {
        // DirEntry::file_type does not follow symlinks
        let file_type = entry.file_type().await.map_err(|e| io_err(entry.path(), e))?;
        if keep(&file_type) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

pub async fn read_json_file(path: &Path) -> Result<Value, DeployError> {
    let raw = tokio::fs::read(path).await.map_err(|e| io_err(path, e))?;
    serde_json::from_slice(&raw).map_err(|e| json_err(path, e))
}

/// Writes `data` as 2-space indented JSON, replacing whatever was at `path`
pub async fn write_json_file<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), DeployError> {
    let raw = serde_json::to_vec_pretty(data).map_err(|e| json_err(path, e))?;
    tokio::fs::write(path, raw).await.map_err(|e| io_err(path, e))
}

/// Removes a file if it exists
pub async fn remove_file(path: &Path) -> Result<(), DeployError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lists_only_directories_as_folders() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("beta")).unwrap();
        fs::create_dir(root.path().join("alpha")).unwrap();
        fs::write(root.path().join("README.md"), "notes").unwrap();

        let folders = list_folders(root.path()).await.unwrap();
        assert_eq!(folders, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_lists_only_files_in_folder() {
        let root = TempDir::new().unwrap();
        let folder = root.path().join("alpha");
        fs::create_dir_all(folder.join("nested")).unwrap();
        fs::write(folder.join("d2.json"), "{}").unwrap();
        fs::write(folder.join("d1.json"), "{}").unwrap();

        let files = list_folder_files(root.path(), "alpha").await.unwrap();
        assert_eq!(files, vec!["d1.json", "d2.json"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let root = TempDir::new().unwrap();
        let err = list_folders(&root.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, DeployError::Io { .. }));
        assert!(!path_exists(&root.path().join("nope")).await);
        assert!(path_exists(root.path()).await);
    }

    #[tokio::test]
    async fn test_json_file_helpers() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("d1.json");

        write_json_file(&path, &json!({"panels": [1, 2], "uid": "u1"})).await.unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"panels\": [\n    1,\n    2\n  ],\n  \"uid\": \"u1\"\n}"
        );
        assert_eq!(read_json_file(&path).await.unwrap(), json!({"uid": "u1", "panels": [1, 2]}));

        remove_file(&path).await.unwrap();
        assert!(!path.exists());
        remove_file(&path).await.unwrap();

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_json_file(&path).await, Err(DeployError::Json { .. })));
    }
}
