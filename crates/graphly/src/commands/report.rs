//! The `report` command: full collection + assessment + artifacts.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use graphly_core::{
    AssessOptions, CollectOptions, LicensingConfig, RunLog, TenantReport, collect,
    pipeline::assess,
};

use crate::cli::{GlobalOpts, ReportArgs};
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::report::{ArtifactSelection, write_artifacts};
use crate::commands::util;

pub async fn handle(args: ReportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Flag > config-file default > built-in.
    let defaults = config::load_config_or_default().defaults;
    let period_days = args.period_days.unwrap_or(defaults.period_days);
    let growth_rate = args.growth_rate.unwrap_or(defaults.growth_rate);
    util::validate_period(period_days)?;
    util::validate_growth_rate(growth_rate)?;

    let client = util::connect(global).await?;

    let options = CollectOptions {
        period_days,
        group_filter: args.group_filter.clone(),
        skip_teams: args.skip_teams,
        skip_planner: args.skip_planner,
        ..CollectOptions::default()
    };

    let spinner = if global.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner().with_message("Collecting tenant metrics...");
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        pb
    };

    let mut log = RunLog::new();
    let snapshot = match collect(&client, &options, &mut log).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            // The run log survives a fatal abort; it records how far the
            // collection got.
            spinner.finish_and_clear();
            log.error(err.to_string());
            let _ = std::fs::create_dir_all(&args.out_dir);
            let _ = std::fs::write(args.out_dir.join("run.log"), log.render());
            return Err(err.into());
        }
    };
    spinner.finish_and_clear();

    let report = assess(
        &snapshot,
        &AssessOptions {
            growth_rate,
            licensing: LicensingConfig::default(),
        },
    );
    log.info("assessment complete");

    let written = write_artifacts(
        &report,
        &log,
        &args.out_dir,
        ArtifactSelection::from_flags(args.json_only, args.html_only),
    )?;

    let color = output::should_color(&global.color);
    let rendered = output::render_single(
        &global.output,
        &report,
        summary_text(&report, &log, color),
        "report".into(),
    );
    output::print_output(&rendered, global.quiet);

    if !global.quiet {
        for path in &written {
            eprintln!("wrote {}", path.display());
        }
    }

    Ok(())
}

/// Human summary for `-o table`.
fn summary_text(report: &TenantReport, log: &RunLog, color: bool) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let org = report
        .organization
        .as_ref()
        .map_or("Unknown Tenant", |o| o.display_name.as_str());

    if color {
        let _ = writeln!(out, "{}", org.bold());
    } else {
        let _ = writeln!(out, "{org}");
    }

    if let Some(users) = report.users.as_ref() {
        let _ = writeln!(
            out,
            "Users: {} total, {} enabled, {} guests",
            users.total, users.enabled, users.guests
        );
    }

    for service in &report.services {
        let note = if service.available { "" } else { " (unavailable)" };
        let _ = writeln!(
            out,
            "{}: {:.2} GB across {} entities{note}",
            service.service, service.totals.total_gb, service.totals.entity_count
        );
    }
    let _ = writeln!(out, "Total storage: {:.2} GB", report.total_storage_gb);

    if let Some(summary) = report.licensing.as_ref() {
        let _ = writeln!(
            out,
            "Licensing: {} licensed users, {:.2} GB entitlement, {} additional licenses needed",
            summary.total_licensed_users, summary.entitlement_gb, summary.additional_units_needed
        );
    }

    let _ = writeln!(
        out,
        "Estimated backup cost: ${:.2}/month (${:.2}/year)",
        report.cost.total_monthly, report.cost.total_annual
    );

    let degraded = report.degraded_sections();
    if degraded > 0 {
        let line = format!(
            "{degraded} section(s) degraded to unavailable ({} warnings in run.log)",
            log.warning_count()
        );
        if color {
            let _ = writeln!(out, "{}", line.yellow());
        } else {
            let _ = writeln!(out, "{line}");
        }
    }

    out.trim_end().to_owned()
}
