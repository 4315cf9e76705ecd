//! # Project Data Structures
//!
//! The `Project` struct is the root container for saved estimates.
//! Projects serialize to `.rkp` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, estimator, project info, timestamps)
//! ├── settings: ProjectSettings (layout constants, default jurisdiction)
//! └── estimates: HashMap<Uuid, SavedEstimate> (request + computed estimate)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rack_core::estimate::EstimateRequest;
//! use rack_core::layout::BuildingEnvelope;
//! use rack_core::project::Project;
//!
//! let mut project = Project::new("Dana Estimator", "Perris DC", "ACME Logistics");
//! let request = EstimateRequest::new(BuildingEnvelope::new(400.0, 200.0, 28.0));
//! let id = project.run_and_add("Option A", request).unwrap();
//!
//! assert!(project.get_estimate(&id).is_some());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compliance::Jurisdiction;
use crate::config::LayoutConfig;
use crate::errors::{CalcError, CalcResult};
use crate::estimate::{run_estimate_with, Estimate, EstimateRequest};

/// Current schema version for .rkp files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Estimates are stored in a flat UUID-keyed map so a saved option keeps
/// its identity when others are added or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,
    pub settings: ProjectSettings,
    pub estimates: HashMap<Uuid, SavedEstimate>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// ```rust
    /// use rack_core::project::Project;
    ///
    /// let project = Project::new("Dana Estimator", "Perris DC", "ACME Logistics");
    /// assert_eq!(project.meta.estimator, "Dana Estimator");
    /// ```
    pub fn new(estimator: impl Into<String>, project_name: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                estimator: estimator.into(),
                project_name: project_name.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: ProjectSettings::default(),
            estimates: HashMap::new(),
        }
    }

    /// Store an already computed estimate. Returns its UUID.
    pub fn add_estimate(&mut self, saved: SavedEstimate) -> Uuid {
        let id = Uuid::new_v4();
        self.estimates.insert(id, saved);
        self.touch();
        id
    }

    /// Run a request against the project's settings and store it.
    ///
    /// Site data without a jurisdiction picks up the project default.
    pub fn run_and_add(&mut self, label: impl Into<String>, mut request: EstimateRequest) -> CalcResult<Uuid> {
        if let Some(site) = request.site.as_mut() {
            if site.resolved_jurisdiction().is_none() {
                site.jurisdiction = Some(self.settings.default_jurisdiction);
            }
        }
        let estimate = run_estimate_with(&self.settings.layout, &request)?;
        Ok(self.add_estimate(SavedEstimate {
            label: label.into(),
            request,
            estimate,
            computed_at: Utc::now(),
        }))
    }

    /// Re-run a saved request, e.g. after the layout settings changed.
    pub fn recompute(&mut self, id: &Uuid) -> CalcResult<()> {
        let layout = self.settings.layout.clone();
        let saved = self
            .estimates
            .get_mut(id)
            .ok_or_else(|| CalcError::invalid_input("id", id.to_string(), "no saved estimate with this id"))?;
        saved.estimate = run_estimate_with(&layout, &saved.request)?;
        saved.computed_at = Utc::now();
        self.touch();
        Ok(())
    }

    pub fn remove_estimate(&mut self, id: &Uuid) -> Option<SavedEstimate> {
        let removed = self.estimates.remove(id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn get_estimate(&self, id: &Uuid) -> Option<&SavedEstimate> {
        self.estimates.get(id)
    }

    /// Saved estimates sorted by label, for stable listings.
    pub fn estimates_by_label(&self) -> Vec<(&Uuid, &SavedEstimate)> {
        let mut entries: Vec<_> = self.estimates.iter().collect();
        entries.sort_by(|a, b| a.1.label.cmp(&b.1.label));
        entries
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn estimate_count(&self) -> usize {
        self.estimates.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub estimator: String,
    pub project_name: String,
    pub client: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Project-wide settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Layout constants used for every estimate in this project
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Used when site data carries no jurisdiction
    #[serde(default)]
    pub default_jurisdiction: Jurisdiction,
}

/// A request together with the estimate it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedEstimate {
    pub label: String,
    pub request: EstimateRequest,
    pub estimate: Estimate,
    pub computed_at: DateTime<Utc>,
}
