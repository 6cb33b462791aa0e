//! Policy and authorization commands

use std::collections::BTreeSet;
use std::time::Instant;

use burner_domain::{AppId, CategoryId, PolicyConfiguration, Result};

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Current selection and whether it meets the minimum coverage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PolicySummary {
    pub policy: PolicyConfiguration,
    pub is_valid: bool,
    pub coverage: String,
    pub setup_completed: bool,
}

/// Replace the restricted categories and exception apps. Returns whether the
/// new selection is valid.
pub async fn update_policy(
    ctx: &AppContext,
    categories: BTreeSet<CategoryId>,
    exceptions: BTreeSet<AppId>,
) -> Result<bool> {
    let start = Instant::now();
    let result = ctx.policy.update_selection(categories, exceptions).await;
    log_command_execution("policy::update_policy", start.elapsed(), result.as_ref().err());
    result
}

pub async fn get_policy(ctx: &AppContext) -> Result<PolicySummary> {
    let start = Instant::now();
    let result = ctx.policy.setup_completed().await.map(|setup_completed| PolicySummary {
        policy: ctx.policy.current(),
        is_valid: ctx.policy.is_valid(),
        coverage: ctx.policy.describe_coverage(),
        setup_completed,
    });
    log_command_execution("policy::get_policy", start.elapsed(), result.as_ref().err());
    result
}

/// Finish onboarding with the current (valid) selection.
pub async fn confirm_setup(ctx: &AppContext) -> Result<()> {
    let start = Instant::now();
    let result = ctx.policy.confirm_setup().await;
    log_command_execution("policy::confirm_setup", start.elapsed(), result.as_ref().err());
    result
}

/// Prompt the platform for the restriction capability.
pub async fn request_authorization(ctx: &AppContext) -> Result<()> {
    let start = Instant::now();
    let result = ctx.controller.request_authorization().await;
    log_command_execution("policy::request_authorization", start.elapsed(), result.as_ref().err());
    result
}
