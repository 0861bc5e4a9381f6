//! Reconciliation of the remote manifest against local state

use crate::core::path::local_file_path;
use crate::sync::filter::FilterRules;
use crate::sync::prober::IntegrityProber;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One file that needs to be (re)downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItem {
    pub remote_path: String,
    pub local_path: PathBuf,
}

/// Files to fetch in manifest order, plus the counts gathered while planning
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadPlan {
    items: Vec<PlanItem>,
    total_remote: usize,
    filtered_in: usize,
    already_valid: usize,
}

impl DownloadPlan {
    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Manifest entries examined, duplicates included
    pub fn total_remote(&self) -> usize {
        self.total_remote
    }

    /// Distinct paths that passed the filter
    pub fn filtered_in(&self) -> usize {
        self.filtered_in
    }

    /// Filtered-in paths whose local copy was already valid
    pub fn already_valid(&self) -> usize {
        self.already_valid
    }
}

/// Build the download plan for a manifest
///
/// Walks the manifest in order. Filtered-out paths and repeated entries
/// are skipped; every remaining path whose local copy fails the prober
/// becomes a [`PlanItem`]. Only reads the local filesystem.
pub async fn build_plan(
    manifest: &[String],
    rules: &FilterRules,
    local_root: &Path,
    prober: &IntegrityProber,
) -> DownloadPlan {
    let mut plan = DownloadPlan {
        total_remote: manifest.len(),
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for remote_path in manifest {
        if !rules.passes(remote_path) {
            tracing::debug!("Skipping {} (filtered out)", remote_path);
            continue;
        }
        if !seen.insert(remote_path.as_str()) {
            tracing::debug!("Skipping duplicate manifest entry {}", remote_path);
            continue;
        }
        plan.filtered_in += 1;

        let local_path = local_file_path(local_root, remote_path);
        if prober.is_valid(remote_path, &local_path).await {
            plan.already_valid += 1;
        } else {
            plan.items.push(PlanItem {
                remote_path: remote_path.clone(),
                local_path,
            });
        }
    }

    plan
}
