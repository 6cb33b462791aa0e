//! Policy configuration service
//!
//! Holds the user's category/exception selection, persists every mutation and
//! answers the minimum-coverage question the lock controller asks on enable.

use std::collections::BTreeSet;

use burner_domain::{AppId, CategoryId, PolicyConfiguration, Result};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::store::SessionStore;

/// Policy configuration service
pub struct PolicyService {
    store: SessionStore,
    min_categories: usize,
    current: RwLock<PolicyConfiguration>,
}

impl PolicyService {
    /// Create a service with an empty selection. Call [`Self::load`] to pick
    /// up the persisted one.
    pub fn new(store: SessionStore, min_categories: usize) -> Self {
        Self { store, min_categories, current: RwLock::new(PolicyConfiguration::default()) }
    }

    /// Replace the cached selection with the persisted one, if any.
    pub async fn load(&self) -> Result<PolicyConfiguration> {
        let policy = self.store.load_policy().await?.unwrap_or_default();
        debug!(
            categories = policy.category_selection.len(),
            exceptions = policy.exception_apps.len(),
            "policy loaded"
        );
        *self.current.write() = policy.clone();
        Ok(policy)
    }

    /// Persist a new selection, then make it current.
    ///
    /// The cache is only updated after the write succeeds so readers never
    /// observe a selection that would be lost on restart.
    pub async fn update_selection(
        &self,
        categories: BTreeSet<CategoryId>,
        exceptions: BTreeSet<AppId>,
    ) -> Result<bool> {
        let policy = PolicyConfiguration::new(categories, exceptions);
        self.store.save_policy(&policy).await?;
        let valid = policy.is_valid(self.min_categories);
        info!(
            categories = policy.category_selection.len(),
            exceptions = policy.exception_apps.len(),
            valid,
            "policy selection updated"
        );
        *self.current.write() = policy;
        Ok(valid)
    }

    pub fn is_valid(&self) -> bool {
        self.current.read().is_valid(self.min_categories)
    }

    /// Fails with `InvalidSetup` when the selection is below the threshold.
    pub fn validate(&self) -> Result<()> {
        self.current.read().validate(self.min_categories)
    }

    pub fn current(&self) -> PolicyConfiguration {
        self.current.read().clone()
    }

    pub fn min_categories(&self) -> usize {
        self.min_categories
    }

    /// Short UI summary of what the selection covers.
    pub fn describe_coverage(&self) -> String {
        self.current.read().describe_coverage(self.min_categories)
    }

    /// Record that the user confirmed a valid selection.
    pub async fn confirm_setup(&self) -> Result<()> {
        self.validate()?;
        self.store.set_setup_completed(true).await?;
        info!("policy setup confirmed");
        Ok(())
    }

    pub async fn setup_completed(&self) -> Result<bool> {
        self.store.setup_completed().await
    }
}
