// Dashboard domain model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const UID_KEY: &str = "uid";
pub const ID_KEY: &str = "id";
pub const VERSION_KEY: &str = "version";

/// Keys grafana assigns on its side; they never belong in the repo and never take part in a diff
pub const SERVER_ASSIGNED_KEYS: [&str; 2] = [ID_KEY, VERSION_KEY];

/// A dashboard as stored in the repo or returned by grafana: a JSON object keyed by `uid`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardDocument(Map<String, Value>);

impl DashboardDocument {
    #[cfg(test)]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn uid(&self) -> Option<&str> {
        self.0.get(UID_KEY).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[cfg(test)]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Everything that keeps this document from being deployed as-is
    pub fn problems(&self) -> Vec<DocumentProblem> {
        let mut problems = Vec::new();
        match self.0.get(UID_KEY) {
            None => problems.push(DocumentProblem::MissingUid),
            Some(Value::String(_)) => {}
            Some(_) => problems.push(DocumentProblem::UidNotString),
        }
        if self.contains(ID_KEY) {
            problems.push(DocumentProblem::ContainsId);
        }
        if self.contains(VERSION_KEY) {
            problems.push(DocumentProblem::ContainsVersion);
        }
        problems
    }

    /// Drops the fields grafana injects on read so the remaining content can be compared with the repo
    pub fn without_server_fields(mut self) -> Self {
        for key in SERVER_ASSIGNED_KEYS {
            self.0.remove(key);
        }
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for DashboardDocument {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// Result of asking grafana for a dashboard by uid
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardLookup {
    Found(DashboardDocument),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentProblem {
    MissingUid,
    UidNotString,
    ContainsId,
    ContainsVersion,
    NotAnObject,
    Unparseable(String),
}

impl fmt::Display for DocumentProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUid => f.write_str("uid must exist"),
            Self::UidNotString => f.write_str("uid must be a string"),
            Self::ContainsId => f.write_str("id must not exist"),
            Self::ContainsVersion => f.write_str("version must not exist"),
            Self::NotAnObject => f.write_str("dashboard must be a JSON object"),
            Self::Unparseable(reason) => write!(f, "dashboard is not valid JSON ({reason})"),
        }
    }
}

/// A problem found in a single file of the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub folder: String,
    pub file: String,
    pub problem: DocumentProblem,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.folder, self.file, self.problem)
    }
}
