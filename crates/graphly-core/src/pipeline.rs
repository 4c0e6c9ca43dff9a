//! Assessment pipeline: one immutable [`CollectionSnapshot`] in, one
//! [`TenantReport`] out.
//!
//! Stages run in a fixed order -- aggregation, growth projection,
//! licensing, cost -- and each consumes the previous stage's output as a
//! plain value. Nothing here talks to the network.

use crate::aggregate::service_report;
use crate::collect::CollectionSnapshot;
use crate::cost;
use crate::growth;
use crate::licensing::{self, LicensingConfig};
use crate::model::{GrowthProjection, Metric, Service, TenantReport};
use crate::units::{bytes_to_gb, round2};

/// Options for the assessment stages.
#[derive(Debug, Clone, Copy)]
pub struct AssessOptions {
    /// Custom growth scenario rate, percent (>= -100 for shrinkage).
    pub growth_rate: i32,
    pub licensing: LicensingConfig,
}

impl Default for AssessOptions {
    fn default() -> Self {
        Self {
            growth_rate: growth::DEFAULT_CUSTOM_RATE,
            licensing: LicensingConfig::default(),
        }
    }
}

/// Run the assessment stages over a snapshot.
pub fn assess(snapshot: &CollectionSnapshot, options: &AssessOptions) -> TenantReport {
    let services = vec![
        service_report(Service::Exchange, &snapshot.mailboxes),
        service_report(Service::OneDrive, &snapshot.drives),
        service_report(Service::SharePoint, &snapshot.sites),
    ];

    // Total over the raw byte sums; per-service rounded figures are
    // display values and never re-summed.
    let total_bytes: u64 = services.iter().map(|s| s.totals.total_bytes).sum();
    let total_storage_gb = round2(bytes_to_gb(total_bytes));

    let growth = growth::project(total_storage_gb, &growth::scenario_rates(options.growth_rate))
        .into_iter()
        .map(|(rate_percent, projected_gb)| GrowthProjection {
            rate_percent,
            projected_gb,
        })
        .collect();

    let licensing_summary = match snapshot.skus.as_ref() {
        Some(skus) => Metric::Available(licensing::summarize(
            skus,
            total_storage_gb,
            &options.licensing,
        )),
        None => Metric::Unavailable,
    };

    // Licensed-user count feeds the mailbox allowance and the cost
    // amortization; a degraded SKU section degrades it to zero, and a
    // zero count falls back to the enabled-user headcount for cost.
    let licensed = snapshot
        .skus
        .as_ref()
        .map_or(0, |skus| licensing::licensed_users(skus));

    let mailbox_mix = match snapshot.mailbox_counts.as_ref() {
        Some(counts) => Metric::Available(licensing::mailbox_mix(counts, licensed)),
        None => Metric::Unavailable,
    };

    let archive = match snapshot.mailbox_counts.as_ref() {
        Some(counts) => Metric::Available(licensing::archive_assessment(
            counts,
            &options.licensing,
        )),
        None => Metric::Unavailable,
    };

    let cost_users = if licensed > 0 {
        licensed
    } else {
        snapshot.users.as_ref().map_or(0, |u| u.enabled)
    };
    let cost = cost::estimate(total_storage_gb, cost_users);

    TenantReport {
        generated_at: snapshot.collected_at,
        period_days: snapshot.period_days,
        organization: snapshot.organization.clone(),
        users: snapshot.users.clone(),
        skus: snapshot.skus.clone(),
        services,
        total_storage_gb,
        growth,
        licensing: licensing_summary,
        mailbox_mix,
        archive,
        collaboration: snapshot.collaboration.clone(),
        planner: snapshot.planner.clone(),
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        LicenseSku, MailboxCounts, OrgProfile, UsageRecord, UserCounts, sku_entitlement,
    };
    use chrono::Utc;
    use uuid::Uuid;

    const GB: u64 = 1024 * 1024 * 1024;

    fn sku(part: &str, consumed: u64) -> LicenseSku {
        let (storage_limit_gb, tier) = sku_entitlement(part);
        LicenseSku {
            sku_id: Uuid::new_v4(),
            sku_part_number: part.into(),
            assigned_units: consumed,
            consumed_units: consumed,
            storage_limit_gb,
            tier,
        }
    }

    fn snapshot() -> CollectionSnapshot {
        CollectionSnapshot {
            collected_at: Utc::now(),
            period_days: 180,
            organization: Metric::Available(OrgProfile {
                tenant_id: "t".into(),
                display_name: "Contoso".into(),
                default_domain: Some("contoso.com".into()),
            }),
            users: Metric::Available(UserCounts {
                total: 120,
                enabled: 110,
                guests: 10,
            }),
            skus: Metric::Available(vec![sku("SPE_E3", 100)]),
            mailboxes: Metric::Available(vec![
                UsageRecord::new("a@contoso.com", "Alice", 3000 * GB),
                UsageRecord::new("b@contoso.com", "Bob", 1000 * GB),
            ]),
            mailbox_counts: Metric::Available(MailboxCounts {
                total: 150,
                regular: 100,
                shared: 50,
                resource: 0,
                with_archive: 75,
            }),
            drives: Metric::Available(vec![UsageRecord::new("a@contoso.com", "Alice", 1500 * GB)]),
            sites: Metric::Available(vec![UsageRecord::new("s1", "https://x", 500 * GB)]),
            collaboration: None,
            planner: None,
        }
    }

    #[test]
    fn services_always_number_three_in_fixed_order() {
        let report = assess(&snapshot(), &AssessOptions::default());

        let names: Vec<String> = report.services.iter().map(|s| s.service.to_string()).collect();
        assert_eq!(names, ["Exchange Online", "OneDrive", "SharePoint Online"]);
    }

    #[test]
    fn total_spans_all_services() {
        let report = assess(&snapshot(), &AssessOptions::default());
        // 4000 + 1500 + 500 GiB
        assert_eq!(report.total_storage_gb, 6000.0);
    }

    #[test]
    fn growth_scenarios_project_the_current_total() {
        let report = assess(&snapshot(), &AssessOptions::default());

        let rates: Vec<i32> = report.growth.iter().map(|g| g.rate_percent).collect();
        assert_eq!(rates, [10, 20, 30]);
        assert_eq!(report.growth[2].projected_gb, 7800.0);
    }

    #[test]
    fn licensing_wired_from_skus_and_total() {
        let report = assess(&snapshot(), &AssessOptions::default());

        let summary = report.licensing.as_ref().expect("skus available");
        assert_eq!(summary.total_licensed_users, 100);
        assert_eq!(summary.entitlement_gb, 5000.0);
        assert_eq!(summary.excess_gb, 1000.0);
        assert_eq!(summary.additional_units_needed, 20);

        let mix = report.mailbox_mix.as_ref().expect("counts available");
        assert_eq!(mix.shared_allowance, 20);
        assert_eq!(mix.excess_shared, 30);
    }

    #[test]
    fn cost_prefers_licensed_users() {
        let report = assess(&snapshot(), &AssessOptions::default());
        assert_eq!(report.cost.user_count, 100);
        assert!(!report.cost.synthetic_baseline);
    }

    #[test]
    fn cost_falls_back_to_enabled_users_without_skus() {
        let mut snap = snapshot();
        snap.skus = Metric::Unavailable;
        let report = assess(&snap, &AssessOptions::default());

        assert_eq!(report.cost.user_count, 110);
        assert!(!report.licensing.is_available());
        // Shared allowance degrades with the licensed count, not the mix.
        let mix = report.mailbox_mix.as_ref().expect("counts available");
        assert_eq!(mix.shared_allowance, 0);
        assert_eq!(mix.excess_shared, 50);
    }

    #[test]
    fn degraded_services_zero_fill_but_stay_marked() {
        let mut snap = snapshot();
        snap.sites = Metric::Unavailable;
        let report = assess(&snap, &AssessOptions::default());

        let sharepoint = &report.services[2];
        assert!(!sharepoint.available);
        assert_eq!(sharepoint.totals.total_gb, 0.0);
        // 4000 + 1500
        assert_eq!(report.total_storage_gb, 5500.0);
        assert_eq!(report.degraded_sections(), 1);
    }

    #[test]
    fn fully_degraded_run_uses_synthetic_cost_baseline() {
        let mut snap = snapshot();
        snap.mailboxes = Metric::Unavailable;
        snap.drives = Metric::Unavailable;
        snap.sites = Metric::Unavailable;
        snap.mailbox_counts = Metric::Unavailable;
        let report = assess(&snap, &AssessOptions::default());

        assert_eq!(report.total_storage_gb, 0.0);
        assert!(report.cost.synthetic_baseline);
        // 100 licensed users × 5 GB
        assert_eq!(report.cost.current_storage_gb, 500.0);
        assert!(!report.mailbox_mix.is_available());
        assert!(!report.archive.is_available());
    }

    #[test]
    fn archive_assessment_from_counts() {
        let report = assess(&snapshot(), &AssessOptions::default());
        let archive = report.archive.as_ref().expect("counts available");

        assert_eq!(archive.threshold, 15.0);
        assert_eq!(archive.excess_archive, 60);
        assert_eq!(archive.additional_units, 2);
    }
}
