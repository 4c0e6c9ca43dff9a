// ── Per-entity usage snapshot types ──

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::units::{bytes_to_gb, round2};

/// The service a usage record belongs to.
///
/// `Display` renders the report-facing service names; these strings are
/// part of the report's label contract and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Service {
    #[strum(serialize = "Exchange Online")]
    #[serde(rename = "exchange")]
    Exchange,
    #[strum(serialize = "OneDrive")]
    #[serde(rename = "onedrive")]
    OneDrive,
    #[strum(serialize = "SharePoint Online")]
    #[serde(rename = "sharepoint")]
    SharePoint,
}

/// One mailbox, drive, or site -- an immutable snapshot from the usage
/// report, alive for a single collection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Principal identifier (UPN or site id) from the report row.
    pub entity_id: String,
    pub display_name: String,
    pub storage_used_bytes: u64,
}

impl UsageRecord {
    pub fn new(
        entity_id: impl Into<String>,
        display_name: impl Into<String>,
        storage_used_bytes: u64,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            display_name: display_name.into(),
            storage_used_bytes,
        }
    }

    /// Size in (binary) GB, rounded to 2 decimals.
    pub fn size_gb(&self) -> f64 {
        round2(bytes_to_gb(self.storage_used_bytes))
    }
}

/// One entry of a service's top-consumers ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEntry {
    pub name: String,
    pub size_gb: f64,
}

/// Aggregated per-service totals. Derived, recomputed each run, never
/// persisted across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceTotals {
    pub total_bytes: u64,
    /// Total in GB, rounded to 2 decimals.
    pub total_gb: f64,
    pub entity_count: u64,
    /// Average per entity in GB; 0 for an empty service.
    pub average_gb: f64,
    /// Top consumers, descending by size, at most 5 entries.
    pub top: Vec<TopEntry>,
}

/// A service section of the report: zero-valued totals plus an
/// availability flag, so a degraded section renders zero-filled while
/// staying distinguishable from genuine zero usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub service: Service,
    pub available: bool,
    pub totals: ServiceTotals,
}
