// Folder domain model
use serde::Deserialize;

pub type FolderId = i64;

/// A folder as listed or created by grafana
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFolder {
    pub id: FolderId,
    pub title: String,
    #[serde(default)]
    pub uid: Option<String>,
}

/// Result of looking a folder up by title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderLookup {
    Found(FolderId),
    NotFound,
}

/// Match a local folder name against grafana's folders by exact title.
/// Grafana does not enforce unique titles; the first folder in listing order wins.
pub fn find_by_title(folders: &[RemoteFolder], title: &str) -> FolderLookup {
    let mut matches = folders.iter().filter(|f| f.title == title);
    let Some(first) = matches.next() else {
        return FolderLookup::NotFound;
    };

    let duplicates = matches.count();
    if duplicates > 0 {
        tracing::warn!(
            "{} grafana folders are titled {:?}, using id {}",
            duplicates + 1,
            title,
            first.id
        );
    }

    FolderLookup::Found(first.id)
}
