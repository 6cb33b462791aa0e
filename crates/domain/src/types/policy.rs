//! Restriction policy types
//!
//! The policy is the user's picker selection: categories to restrict and
//! apps that stay reachable even when their category is restricted.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BurnerError, Result};

/// Opaque identifier of an application category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

/// Opaque identifier of a single application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub String);

impl CategoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AppId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of restricted targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfiguration {
    pub category_selection: BTreeSet<CategoryId>,
    pub exception_apps: BTreeSet<AppId>,
}

/// Command shape sent to the restriction enforcement port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnforcementPlan {
    RestrictAll,
    RestrictAllExcept(BTreeSet<AppId>),
}

impl PolicyConfiguration {
    pub fn new(categories: BTreeSet<CategoryId>, exceptions: BTreeSet<AppId>) -> Self {
        Self { category_selection: categories, exception_apps: exceptions }
    }

    pub fn is_valid(&self, min_categories: usize) -> bool {
        self.category_selection.len() >= min_categories
    }

    /// Check the minimum-coverage rule.
    ///
    /// # Errors
    /// Returns `BurnerError::InvalidSetup` when fewer than `min_categories`
    /// categories are selected.
    pub fn validate(&self, min_categories: usize) -> Result<()> {
        if self.is_valid(min_categories) {
            Ok(())
        } else {
            Err(BurnerError::InvalidSetup(format!(
                "select at least {min_categories} categories ({} selected)",
                self.category_selection.len()
            )))
        }
    }

    pub fn enforcement_plan(&self) -> EnforcementPlan {
        if self.exception_apps.is_empty() {
            EnforcementPlan::RestrictAll
        } else {
            EnforcementPlan::RestrictAllExcept(self.exception_apps.clone())
        }
    }

    pub fn describe_coverage(&self, min_categories: usize) -> String {
        let categories = self.category_selection.len();
        let exceptions = self.exception_apps.len();
        let category_word = if categories == 1 { "category" } else { "categories" };
        let exception_part = match exceptions {
            0 => "no exceptions".to_string(),
            1 => "1 app allowed".to_string(),
            n => format!("{n} apps allowed"),
        };

        if self.is_valid(min_categories) {
            format!("{categories} {category_word} blocked, {exception_part}")
        } else {
            let missing = min_categories - categories;
            format!(
                "{categories} {category_word} selected, {missing} more needed ({exception_part})"
            )
        }
    }
}
