//! Static HTML rendering of a [`TenantReport`].
//!
//! One self-contained document: inline CSS, labeled metric panels, a
//! growth-projection table, and a top-5 table per service. Each panel
//! places the value element immediately before its label element; the
//! label strings are stable and treated as part of the document's
//! contract with existing readers. Degraded sections render zero-filled
//! with a `degraded` class annotation, never omitted.

use std::fmt::Write;

use graphly_core::units::round2;
use graphly_core::{ServiceReport, TenantReport};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:2rem auto;max-width:60rem;color:#1a1a2e}\
h1{font-size:1.4rem}h2{font-size:1.1rem;border-bottom:1px solid #ddd;padding-bottom:.3rem}\
.meta{color:#666;font-size:.85rem}\
.panels{display:flex;flex-wrap:wrap;gap:.75rem;margin:.75rem 0}\
.panel{border:1px solid #ddd;border-radius:.5rem;padding:.6rem 1rem;min-width:9rem}\
.panel .value{display:block;font-size:1.3rem;font-weight:600}\
.panel .label{display:block;color:#555;font-size:.8rem}\
.panel.degraded{border-color:#d97706;background:#fffbeb}\
.panel.degraded .label::after{content:' (unavailable)';color:#d97706}\
table{border-collapse:collapse;margin:.75rem 0}\
th,td{border:1px solid #ddd;padding:.35rem .7rem;text-align:left}\
td.num{text-align:right}\
caption{caption-side:top;text-align:left;font-weight:600;padding-bottom:.3rem}";

/// Render the complete report document.
pub fn render(report: &TenantReport) -> String {
    let mut out = String::with_capacity(16 * 1024);

    let org_name = report
        .organization
        .as_ref()
        .map_or("Unknown Tenant", |o| o.display_name.as_str());

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = write!(
        out,
        "<title>Microsoft 365 Usage Assessment - {}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape(org_name)
    );

    let _ = write!(
        out,
        "<h1>Microsoft 365 Usage Assessment &mdash; {}</h1>\n",
        escape(org_name)
    );
    let degraded = report.degraded_sections();
    let _ = write!(
        out,
        "<p class=\"meta\">Generated {} &middot; trailing {}-day window{}</p>\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.period_days,
        if degraded > 0 {
            format!(" &middot; {degraded} section(s) unavailable")
        } else {
            String::new()
        }
    );

    tenant_section(&mut out, report);
    storage_section(&mut out, report);
    growth_section(&mut out, report);
    licensing_section(&mut out, report);
    mailbox_section(&mut out, report);
    collaboration_section(&mut out, report);
    cost_section(&mut out, report);
    top_consumers_section(&mut out, report);

    out.push_str("</body>\n</html>\n");
    out
}

// ── Sections ─────────────────────────────────────────────────────────

fn tenant_section(out: &mut String, report: &TenantReport) {
    out.push_str("<h2>Tenant</h2>\n<div class=\"panels\">\n");

    let users = report.users.as_ref();
    let degraded = !report.users.is_available();
    panel(out, &count(users.map(|u| u.total)), "Total Users", degraded);
    panel(out, &count(users.map(|u| u.enabled)), "Enabled Users", degraded);
    panel(out, &count(users.map(|u| u.guests)), "Guest Users", degraded);

    let licensed = report.licensing.as_ref().map(|l| l.total_licensed_users);
    panel(
        out,
        &count(licensed),
        "Licensed Users",
        !report.licensing.is_available(),
    );

    out.push_str("</div>\n");
}

fn storage_section(out: &mut String, report: &TenantReport) {
    out.push_str("<h2>Storage by Service</h2>\n<div class=\"panels\">\n");

    for service in &report.services {
        panel(
            out,
            &gb(service.totals.total_gb),
            &service.service.to_string(),
            !service.available,
        );
    }
    panel(out, &gb(report.total_storage_gb), "Total Storage (GB)", false);

    out.push_str("</div>\n");
}

fn growth_section(out: &mut String, report: &TenantReport) {
    out.push_str("<h2>Growth Projections</h2>\n");
    out.push_str(
        "<table id=\"growth\">\n<tr><th>Annual Growth</th><th>Projected Storage (GB)</th></tr>\n",
    );
    for row in &report.growth {
        let _ = write!(
            out,
            "<tr><td>{}%</td><td class=\"num\">{}</td></tr>\n",
            row.rate_percent,
            gb(row.projected_gb)
        );
    }
    out.push_str("</table>\n");
}

fn licensing_section(out: &mut String, report: &TenantReport) {
    out.push_str("<h2>Licensing</h2>\n<div class=\"panels\">\n");

    let summary = report.licensing.as_ref();
    let degraded = !report.licensing.is_available();
    panel(
        out,
        &gb(summary.map_or(0.0, |s| s.entitlement_gb)),
        "Entitlement (GB)",
        degraded,
    );
    panel(
        out,
        &gb(summary.map_or(0.0, |s| s.excess_gb)),
        "Excess Storage (GB)",
        degraded,
    );
    panel(
        out,
        &count(summary.map(|s| s.additional_units_needed)),
        "Additional Licenses Needed",
        degraded,
    );

    out.push_str("</div>\n");
}

fn mailbox_section(out: &mut String, report: &TenantReport) {
    out.push_str("<h2>Mailbox Population</h2>\n<div class=\"panels\">\n");

    let mix = report.mailbox_mix.as_ref();
    let degraded = !report.mailbox_mix.is_available();
    panel(out, &count(mix.map(|m| m.total)), "Total Mailboxes", degraded);
    panel(out, &count(mix.map(|m| m.shared)), "Shared Mailboxes", degraded);
    panel(
        out,
        &count(mix.map(|m| m.shared_allowance)),
        "Shared Mailbox Allowance",
        degraded,
    );
    panel(
        out,
        &count(mix.map(|m| m.additional_units_for_shared)),
        "Additional Licenses (Shared)",
        degraded,
    );
    panel(
        out,
        &count(mix.map(|m| m.archive_enabled)),
        "Archive Mailboxes",
        degraded,
    );

    let archive = report.archive.as_ref();
    panel(
        out,
        &count(archive.map(|a| a.additional_units)),
        "Additional Licenses (Archive)",
        !report.archive.is_available(),
    );

    out.push_str("</div>\n");
}

fn collaboration_section(out: &mut String, report: &TenantReport) {
    // Skipped sub-analyses are omitted entirely; only degraded ones
    // render zero-filled.
    let Some(collab) = &report.collaboration else {
        return;
    };

    out.push_str("<h2>Collaboration</h2>\n<div class=\"panels\">\n");
    let counts = collab.as_ref();
    let degraded = !collab.is_available();
    panel(out, &count(counts.map(|c| c.teams)), "Teams", degraded);
    panel(
        out,
        &count(counts.map(|c| c.groups)),
        "Microsoft 365 Groups",
        degraded,
    );
    out.push_str("</div>\n");
}

fn cost_section(out: &mut String, report: &TenantReport) {
    out.push_str("<h2>Backup Cost Estimate</h2>\n");
    if report.cost.synthetic_baseline {
        let _ = write!(
            out,
            "<p class=\"meta\">No usage data was collected; the estimate assumes a \
             {} GB-per-user baseline.</p>\n",
            gb(report.cost.current_storage_gb / report.cost.user_count.max(1) as f64)
        );
    }

    out.push_str("<div class=\"panels\">\n");
    panel(
        out,
        &money(report.cost.total_monthly),
        "Monthly Cost (USD)",
        false,
    );
    panel(
        out,
        &money(report.cost.total_annual),
        "Annual Cost (USD)",
        false,
    );
    if let Some(per_user) = report.cost.per_user_monthly {
        panel(out, &money(per_user), "Cost per User (Monthly)", false);
    }
    out.push_str("</div>\n");
}

fn top_consumers_section(out: &mut String, report: &TenantReport) {
    out.push_str("<h2>Top Consumers</h2>\n");
    for service in &report.services {
        top_table(out, service);
    }
}

fn top_table(out: &mut String, service: &ServiceReport) {
    let _ = write!(
        out,
        "<table class=\"top\">\n<caption>{}{}</caption>\n<tr><th>Name</th><th>Size (GB)</th></tr>\n",
        service.service,
        if service.available { "" } else { " (unavailable)" }
    );
    for entry in &service.totals.top {
        let _ = write!(
            out,
            "<tr><td>{}</td><td class=\"num\">{}</td></tr>\n",
            escape(&entry.name),
            gb(entry.size_gb)
        );
    }
    out.push_str("</table>\n");
}

// ── Building blocks ──────────────────────────────────────────────────

/// One metric panel. The value element sits immediately before the label
/// element; readers rely on that adjacency.
fn panel(out: &mut String, value: &str, label: &str, degraded: bool) {
    let class = if degraded { "panel degraded" } else { "panel" };
    let _ = write!(
        out,
        "<div class=\"{class}\"><span class=\"value\">{}</span><span class=\"label\">{}</span></div>\n",
        escape(value),
        escape(label)
    );
}

fn count<T: Into<u64>>(value: Option<T>) -> String {
    value.map_or(0u64, Into::into).to_string()
}

fn gb(value: f64) -> String {
    format!("{:.2}", round2(value))
}

fn money(value: f64) -> String {
    format!("{:.2}", round2(value))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use graphly_core::{
        AssessOptions, CollectionSnapshot, LicenseSku, MailboxCounts, Metric, OrgProfile,
        UsageRecord, UserCounts, assess, model::sku_entitlement,
    };
    use uuid::Uuid;

    const GB_BYTES: u64 = 1024 * 1024 * 1024;

    fn sample_report() -> TenantReport {
        let (storage_limit_gb, tier) = sku_entitlement("SPE_E3");
        let snapshot = CollectionSnapshot {
            collected_at: Utc::now(),
            period_days: 180,
            organization: Metric::Available(OrgProfile {
                tenant_id: "t".into(),
                display_name: "Contoso & Sons".into(),
                default_domain: Some("contoso.com".into()),
            }),
            users: Metric::Available(UserCounts {
                total: 120,
                enabled: 110,
                guests: 10,
            }),
            skus: Metric::Available(vec![LicenseSku {
                sku_id: Uuid::nil(),
                sku_part_number: "SPE_E3".into(),
                assigned_units: 110,
                consumed_units: 100,
                storage_limit_gb,
                tier,
            }]),
            mailboxes: Metric::Available(vec![
                UsageRecord::new("a@contoso.com", "Alice <Admin>", 3000 * GB_BYTES),
                UsageRecord::new("b@contoso.com", "Bob", 1000 * GB_BYTES),
            ]),
            mailbox_counts: Metric::Available(MailboxCounts {
                total: 150,
                regular: 100,
                shared: 50,
                resource: 0,
                with_archive: 75,
            }),
            drives: Metric::Available(vec![UsageRecord::new(
                "a@contoso.com",
                "Alice <Admin>",
                1500 * GB_BYTES,
            )]),
            sites: Metric::Unavailable,
            collaboration: None,
            planner: None,
        };
        assess(&snapshot, &AssessOptions::default())
    }

    /// Pull the value whose label element immediately follows it.
    fn extract(html: &str, label: &str) -> Option<String> {
        let needle = format!("<span class=\"label\">{}</span>", escape(label));
        let idx = html.find(&needle)?;
        let before = &html[..idx];
        let start = before.rfind("<span class=\"value\">")? + "<span class=\"value\">".len();
        let end = before[start..].find("</span>")? + start;
        Some(before[start..end].to_string())
    }

    #[test]
    fn values_extract_back_by_label() {
        let report = sample_report();
        let html = render(&report);

        assert_eq!(extract(&html, "Total Users").as_deref(), Some("120"));
        assert_eq!(extract(&html, "Licensed Users").as_deref(), Some("100"));
        assert_eq!(extract(&html, "Exchange Online").as_deref(), Some("4000.00"));
        assert_eq!(
            extract(&html, "Additional Licenses Needed").as_deref(),
            Some("10")
        );
    }

    #[test]
    fn extracted_numbers_match_within_rounding() {
        let report = sample_report();
        let html = render(&report);

        let total: f64 = extract(&html, "Total Storage (GB)")
            .expect("panel present")
            .parse()
            .expect("numeric");
        assert!((total - report.total_storage_gb).abs() < 0.005);

        let monthly: f64 = extract(&html, "Monthly Cost (USD)")
            .expect("panel present")
            .parse()
            .expect("numeric");
        assert!((monthly - report.cost.total_monthly).abs() < 0.005);
    }

    #[test]
    fn degraded_service_is_annotated_not_omitted() {
        let report = sample_report();
        let html = render(&report);

        // SharePoint degraded: zero-filled value with the degraded class.
        assert_eq!(extract(&html, "SharePoint Online").as_deref(), Some("0.00"));
        assert!(html.contains("panel degraded"));
        assert!(html.contains("SharePoint Online (unavailable)"));
    }

    #[test]
    fn growth_table_lists_each_scenario() {
        let report = sample_report();
        let html = render(&report);

        for row in &report.growth {
            assert!(html.contains(&format!("<td>{}%</td>", row.rate_percent)));
        }
    }

    #[test]
    fn entity_names_are_escaped() {
        let html = render(&sample_report());
        assert!(html.contains("Alice &lt;Admin&gt;"));
        assert!(html.contains("Contoso &amp; Sons"));
        assert!(!html.contains("Alice <Admin>"));
    }

    #[test]
    fn skipped_sections_are_omitted() {
        let html = render(&sample_report());
        assert!(!html.contains("Collaboration"));
    }
}
