// Application layer - Validation, reconciliation and the run that ties them together
pub mod deploy_service;
pub mod grafana_gateway;
pub mod reconcile_service;
pub mod validation_service;

#[cfg(test)]
pub mod test_support;
