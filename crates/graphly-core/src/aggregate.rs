//! Aggregator: per-entity usage records → per-service totals.
//!
//! One service's records in, one [`ServiceTotals`] out. An empty input
//! (including an upstream collection failure degraded to empty) yields a
//! zero-valued result, never an error -- one service failing must not
//! block the others.

use crate::model::{Metric, Service, ServiceReport, ServiceTotals, TopEntry, UsageRecord};
use crate::units::{bytes_to_gb, round2};

/// Maximum entries in the top-consumers ranking.
const TOP_N: usize = 5;

/// Reduce a service's usage records into totals and a top-5 ranking.
///
/// The ranking is descending by size with ties kept in original order
/// (stable sort), truncated to [`TOP_N`].
pub fn aggregate(records: &[UsageRecord]) -> ServiceTotals {
    let total_bytes: u64 = records.iter().map(|r| r.storage_used_bytes).sum();
    let entity_count = records.len() as u64;

    let average_gb = if entity_count == 0 {
        0.0
    } else {
        round2(bytes_to_gb(total_bytes) / entity_count as f64)
    };

    let mut ranked: Vec<&UsageRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.storage_used_bytes.cmp(&a.storage_used_bytes));
    let top = ranked
        .into_iter()
        .take(TOP_N)
        .map(|r| TopEntry {
            name: r.display_name.clone(),
            size_gb: r.size_gb(),
        })
        .collect();

    ServiceTotals {
        total_bytes,
        total_gb: round2(bytes_to_gb(total_bytes)),
        entity_count,
        average_gb,
        top,
    }
}

/// Build the report section for one service from its collected records.
///
/// A degraded (`Unavailable`) collection produces zero-valued totals
/// with `available: false`.
pub fn service_report(service: Service, records: &Metric<Vec<UsageRecord>>) -> ServiceReport {
    match records.as_ref() {
        Some(records) => ServiceReport {
            service,
            available: true,
            totals: aggregate(records),
        },
        None => ServiceReport {
            service,
            available: false,
            totals: ServiceTotals::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    fn rec(name: &str, bytes: u64) -> UsageRecord {
        UsageRecord::new(format!("{name}@contoso.com"), name, bytes)
    }

    #[test]
    fn empty_input_is_zero_not_error() {
        let totals = aggregate(&[]);
        assert_eq!(totals.total_bytes, 0);
        assert_eq!(totals.total_gb, 0.0);
        assert_eq!(totals.entity_count, 0);
        assert_eq!(totals.average_gb, 0.0);
        assert!(totals.top.is_empty());
    }

    #[test]
    fn top_is_descending_and_capped_at_five() {
        let records: Vec<UsageRecord> = (1..=8).map(|i| rec(&format!("u{i}"), i * GB)).collect();
        let totals = aggregate(&records);

        assert_eq!(totals.entity_count, 8);
        assert_eq!(totals.top.len(), 5);
        assert_eq!(totals.top[0].name, "u8");
        assert_eq!(totals.top[0].size_gb, 8.0);
        for pair in totals.top.windows(2) {
            assert!(pair[0].size_gb >= pair[1].size_gb);
        }
    }

    #[test]
    fn ties_keep_original_order() {
        let records = vec![rec("first", GB), rec("second", GB), rec("third", 2 * GB)];
        let totals = aggregate(&records);

        assert_eq!(totals.top[0].name, "third");
        assert_eq!(totals.top[1].name, "first");
        assert_eq!(totals.top[2].name, "second");
    }

    #[test]
    fn totals_use_binary_gb_rounded() {
        // 1.5 GiB + 0.25 GiB = 1.75 GiB
        let records = vec![rec("a", GB + GB / 2), rec("b", GB / 4)];
        let totals = aggregate(&records);

        assert_eq!(totals.total_gb, 1.75);
        assert_eq!(totals.average_gb, 0.88); // 0.875 rounds half away from zero
    }

    #[test]
    fn degraded_service_renders_zero_filled() {
        let report = service_report(Service::SharePoint, &Metric::Unavailable);
        assert!(!report.available);
        assert_eq!(report.totals, ServiceTotals::default());
    }
}
