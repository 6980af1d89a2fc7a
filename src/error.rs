// Error taxonomy for a deployment run
use crate::domain::dashboard::Violation;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a run can fail. All of them are fatal for the current run and none are retried.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("environment variable must be set: {variable}")]
    Configuration { variable: &'static str },

    #[error("source path must exist: {}", .path.display())]
    Path { path: PathBuf },

    #[error(transparent)]
    Structure(#[from] StructureProblem),

    #[error("{} dashboard problem(s) found in the repo that are not valid for deployment", .violations.len())]
    Validation { violations: Vec<Violation> },

    #[error("{operation} failed with status {status}: {body}")]
    Remote {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to grafana failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not load grafana settings: {0}")]
    Settings(#[from] config::ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureProblem {
    #[error("source path contains no folders")]
    NoFolders,

    #[error("source path folder contains no files: {}", .0.join(", "))]
    EmptyFolders(Vec<String>),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DeployError {
    DeployError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn json_err(path: impl Into<PathBuf>, source: serde_json::Error) -> DeployError {
    DeployError::Json {
        path: path.into(),
        source,
    }
}
