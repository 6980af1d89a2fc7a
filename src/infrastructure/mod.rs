// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod dashboard_diff;
pub mod grafana_client;
pub mod source_tree;
