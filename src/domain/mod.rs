// Domain layer - Dashboards, folders and reconciliation outcomes
pub mod dashboard;
pub mod folder;
pub mod outcome;
