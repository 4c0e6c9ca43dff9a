//! LicensingEngine: entitlement vs usage, shared-mailbox allowance, and
//! the archive-threshold mode.
//!
//! Two of these calculations look parallel but use different divisors on
//! purpose: storage excess divides by the per-user GB entitlement, while
//! shared-mailbox excess divides by a flat mailboxes-per-license
//! headcount ratio.

use crate::model::{ArchiveAssessment, LicenseSku, LicensingSummary, MailboxCounts, MailboxMix};
use crate::units::{round2, units_needed};

/// Flat headcount ratio for shared-mailbox licensing. Not the GB
/// entitlement -- one license covers this many shared mailboxes.
pub const MAILBOXES_PER_LICENSE: f64 = 50.0;

/// Shared mailboxes allowed per licensed user.
pub const SHARED_ALLOWANCE_RATE: f64 = 0.20;

/// Tunable licensing parameters.
#[derive(Debug, Clone, Copy)]
pub struct LicensingConfig {
    /// Storage entitlement per paid seat, GB.
    pub per_user_gb: f64,
    /// Percent of total mailboxes allowed to carry an archive before
    /// extra units are required.
    pub archive_threshold_percent: f64,
}

impl Default for LicensingConfig {
    fn default() -> Self {
        Self {
            per_user_gb: 50.0,
            archive_threshold_percent: 10.0,
        }
    }
}

/// Licensed-user count: consumed units summed across entitled SKUs.
///
/// Excluded free-tier SKUs do not contribute at all -- they are removed
/// from the count, not zero-weighted.
pub fn licensed_users(skus: &[LicenseSku]) -> u64 {
    skus.iter()
        .filter(|sku| sku.is_entitled())
        .map(|sku| sku.consumed_units)
        .sum()
}

/// Compare the tenant's entitlement against current storage.
///
/// `current_usage_gb` is the *current* total, never a projected value.
/// With zero licensed users the entitlement is zero and the excess equals
/// the full usage; per-user figures elsewhere guard on the zero count.
pub fn summarize(
    skus: &[LicenseSku],
    current_usage_gb: f64,
    config: &LicensingConfig,
) -> LicensingSummary {
    let total_licensed_users = licensed_users(skus);
    let entitlement_gb = total_licensed_users as f64 * config.per_user_gb;
    let excess_gb = (current_usage_gb - entitlement_gb).max(0.0);

    LicensingSummary {
        total_licensed_users,
        entitlement_gb: round2(entitlement_gb),
        current_usage_gb: round2(current_usage_gb),
        excess_gb: round2(excess_gb),
        additional_units_needed: units_needed(excess_gb, config.per_user_gb),
    }
}

/// Evaluate the mailbox population against the shared-mailbox allowance.
pub fn mailbox_mix(counts: &MailboxCounts, licensed: u64) -> MailboxMix {
    let archive_percent = if counts.total == 0 {
        0.0
    } else {
        round2(counts.with_archive as f64 / counts.total as f64 * 100.0)
    };

    let shared_allowance = (licensed as f64 * SHARED_ALLOWANCE_RATE).round() as u64;
    let excess_shared = counts.shared.saturating_sub(shared_allowance);

    MailboxMix {
        total: counts.total,
        regular: counts.regular,
        shared: counts.shared,
        resource: counts.resource,
        archive_enabled: counts.with_archive,
        archive_percent,
        shared_allowance,
        excess_shared,
        additional_units_for_shared: units_needed(excess_shared as f64, MAILBOXES_PER_LICENSE),
    }
}

/// Archive-threshold mode: archives beyond a percentage of the mailbox
/// population require additional units.
pub fn archive_assessment(counts: &MailboxCounts, config: &LicensingConfig) -> ArchiveAssessment {
    let threshold = counts.total as f64 * (config.archive_threshold_percent / 100.0);
    let excess = (counts.with_archive as f64 - threshold).max(0.0);

    ArchiveAssessment {
        threshold: round2(threshold),
        archive_mailboxes: counts.with_archive,
        excess_archive: excess.ceil() as u64,
        additional_units: units_needed(excess, config.per_user_gb),
    }
}
