use crate::error::DeployError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_SOURCE_PATH: &str = "./monitoring";
pub const AUTHORIZATION_VARIABLE: &str = "GRAFANA_AUTHORIZATION";
pub const HOST_VARIABLE: &str = "GRAFANA_HOST";

/// Connection settings for the target grafana. Both values are checked before any deployment work.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct GrafanaSettings {
    #[serde(default)]
    pub authorization: String,
    #[serde(default)]
    pub host: String,
}

impl GrafanaSettings {
    #[cfg(test)]
    pub fn new(authorization: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            authorization: authorization.into(),
            host: host.into(),
        }
    }

    /// `http://{host}` unless the host already names a scheme
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        }
    }
}

/// Options for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub source_path: PathBuf,
    pub dry_run: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            dry_run: false,
        }
    }
}

/// Loads grafana settings from an optional `config/grafana` file, overridden by `GRAFANA_*` variables
pub fn load_grafana_settings() -> Result<GrafanaSettings, DeployError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/grafana").required(false))
        .add_source(config::Environment::with_prefix("GRAFANA"));

    settings_from(builder)
}

fn settings_from(builder: ConfigBuilder<DefaultState>) -> Result<GrafanaSettings, DeployError> {
    let settings = builder.build()?;
    Ok(settings.try_deserialize()?)
}

/// Loose flag parsing: `"true"`, `"1"` and `true` are set, anything else is not
pub trait Truthy {
    fn is_true(&self) -> bool;
}

impl Truthy for str {
    fn is_true(&self) -> bool {
        matches!(self, "true" | "1")
    }
}

impl Truthy for String {
    fn is_true(&self) -> bool {
        self.as_str().is_true()
    }
}

impl Truthy for bool {
    fn is_true(&self) -> bool {
        *self
    }
}

impl<T: Truthy + ?Sized> Truthy for Option<&T> {
    fn is_true(&self) -> bool {
        self.is_some_and(|v| v.is_true())
    }
}

/// True when running as a step of an automation workflow
pub fn is_automation(lookup: impl Fn(&str) -> Option<String>) -> bool {
    lookup("GITHUB_ACTIONS").as_deref().is_true()
}

/// Run arguments supplied as workflow step inputs (`INPUT_<NAME>` variables)
pub fn run_args_from_action_inputs(lookup: impl Fn(&str) -> Option<String>) -> RunArgs {
    let input = |name: &str| {
        lookup(&format!("INPUT_{}", name.replace(' ', "_").to_uppercase()))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    RunArgs {
        source_path: input("sourcePath")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_PATH)),
        dry_run: input("dryRun").as_deref().is_true(),
    }
}
