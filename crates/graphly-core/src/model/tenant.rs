// ── Tenant-level profile and count types ──

use serde::{Deserialize, Serialize};

/// Organization profile from the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgProfile {
    pub tenant_id: String,
    pub display_name: String,
    pub default_domain: Option<String>,
}

/// User population counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
    pub total: u64,
    pub enabled: u64,
    pub guests: u64,
}

/// Mailbox population counts by recipient type, from the mailbox usage
/// report (deleted mailboxes excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxCounts {
    pub total: u64,
    /// UserMailbox rows.
    pub regular: u64,
    /// SharedMailbox rows.
    pub shared: u64,
    /// Room + Equipment rows.
    pub resource: u64,
    /// Rows with an in-place archive enabled.
    pub with_archive: u64,
}

/// Teams / group counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationCounts {
    pub teams: u64,
    pub groups: u64,
}

/// A small sample of planner plans, collected for workload visibility
/// rather than sizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerSample {
    pub groups_sampled: u64,
    pub plan_titles: Vec<String>,
}
