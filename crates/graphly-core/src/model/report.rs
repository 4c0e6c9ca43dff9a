// ── The exported report object ──
//
// `TenantReport` is the single structured interchange artifact: the
// pipeline produces it once, the HTML renderer and any viewer consume it.
// No downstream component re-parses rendered output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cost::CostEstimate;
use super::license::{ArchiveAssessment, LicenseSku, LicensingSummary, MailboxMix};
use super::metric::Metric;
use super::tenant::{CollaborationCounts, OrgProfile, PlannerSample, UserCounts};
use super::usage::ServiceReport;

/// One growth scenario row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub rate_percent: i32,
    pub projected_gb: f64,
}

/// The complete assessment for one tenant, one run.
///
/// Immutable once assembled; each pipeline stage contributed its output
/// as an input to the next rather than mutating shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantReport {
    pub generated_at: DateTime<Utc>,
    pub period_days: u32,

    pub organization: Metric<OrgProfile>,
    pub users: Metric<UserCounts>,
    pub skus: Metric<Vec<LicenseSku>>,

    /// Exchange, OneDrive, SharePoint -- always all three, zero-filled
    /// when degraded.
    pub services: Vec<ServiceReport>,
    /// Sum across available services, GB, 2 decimals.
    pub total_storage_gb: f64,

    pub growth: Vec<GrowthProjection>,

    pub licensing: Metric<LicensingSummary>,
    pub mailbox_mix: Metric<MailboxMix>,
    pub archive: Metric<ArchiveAssessment>,

    /// `None` when skipped by the operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaboration: Option<Metric<CollaborationCounts>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planner: Option<Metric<PlannerSample>>,

    pub cost: CostEstimate,
}

impl TenantReport {
    /// Count of sections that degraded to unavailable during collection.
    pub fn degraded_sections(&self) -> usize {
        let mut n = 0;
        n += usize::from(!self.organization.is_available());
        n += usize::from(!self.users.is_available());
        n += usize::from(!self.skus.is_available());
        n += self.services.iter().filter(|s| !s.available).count();
        if let Some(c) = &self.collaboration {
            n += usize::from(!c.is_available());
        }
        if let Some(p) = &self.planner {
            n += usize::from(!p.is_available());
        }
        n
    }
}
