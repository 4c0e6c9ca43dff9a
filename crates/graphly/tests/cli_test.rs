//! Integration tests for the `graphly` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live tenant.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `graphly` binary with env isolation.
///
/// Clears all `GRAPHLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn graphly_cmd() -> assert_cmd::Command {
    graphly_cmd_with_home("/tmp/graphly-cli-test-nonexistent")
}

/// Same isolation, but config directories point at `home` so a test can
/// seed its own config.toml.
fn graphly_cmd_with_home(home: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("graphly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("GRAPHLY_PROFILE")
        .env_remove("GRAPHLY_TENANT_ID")
        .env_remove("GRAPHLY_CLIENT_ID")
        .env_remove("GRAPHLY_CLIENT_SECRET")
        .env_remove("GRAPHLY_CA_CERT")
        .env_remove("GRAPHLY_OUTPUT")
        .env_remove("GRAPHLY_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = graphly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    graphly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Microsoft 365")
            .and(predicate::str::contains("report"))
            .and(predicate::str::contains("usage"))
            .and(predicate::str::contains("licenses")),
    );
}

#[test]
fn test_version_flag() {
    graphly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("graphly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    graphly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    graphly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = graphly_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_report_invalid_period_rejected_before_auth() {
    // Period validation runs before credential resolution, so a bad
    // window fails with a usage error even with no config at all.
    let output = graphly_cmd()
        .args(["report", "--period-days", "45"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("7, 30, 90, or 180"),
        "Expected valid-window list in error:\n{text}"
    );
}

#[test]
fn test_usage_invalid_period_rejected() {
    let output = graphly_cmd()
        .args(["usage", "mailbox", "--period-days", "365"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
}

#[test]
fn test_growth_rate_below_floor_rejected() {
    let output = graphly_cmd()
        .args(["report", "--growth-rate", "-150"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("-100"),
        "Expected the -100 floor in the error:\n{text}"
    );
}

#[test]
fn test_negative_growth_rate_accepted() {
    // A shrinkage rate parses and validates; the run then stops at
    // credential resolution (exit 3), not argument parsing (exit 2).
    let output = graphly_cmd()
        .args(["report", "--growth-rate", "-25"])
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(3),
        "Expected auth exit code 3:\n{}",
        combined_output(&output)
    );
}

#[test]
fn test_period_default_comes_from_config_file() {
    // An invalid window in [defaults] fails validation before credential
    // resolution, proving the config-file default is actually applied.
    let home = "/tmp/graphly-cli-test-config-period";
    let cfg_dir = format!("{home}/graphly");
    std::fs::create_dir_all(&cfg_dir).unwrap();
    std::fs::write(
        format!("{cfg_dir}/config.toml"),
        "[defaults]\nperiod_days = 45\n",
    )
    .unwrap();

    let output = graphly_cmd_with_home(home).arg("report").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("45"), "Expected the config value 45:\n{text}");
}

#[test]
fn test_period_flag_overrides_config_default() {
    let home = "/tmp/graphly-cli-test-config-period-flag";
    let cfg_dir = format!("{home}/graphly");
    std::fs::create_dir_all(&cfg_dir).unwrap();
    std::fs::write(
        format!("{cfg_dir}/config.toml"),
        "[defaults]\nperiod_days = 45\n",
    )
    .unwrap();

    // The flag wins over the (invalid) config default, so validation
    // passes and the run stops at credential resolution instead.
    let output = graphly_cmd_with_home(home)
        .args(["report", "--period-days", "90"])
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(3),
        "Expected auth exit code 3:\n{}",
        combined_output(&output)
    );
}

#[test]
fn test_report_no_credentials() {
    let output = graphly_cmd().arg("report").output().unwrap();
    assert_eq!(
        output.status.code(),
        Some(3),
        "Expected auth exit code 3:\n{}",
        combined_output(&output)
    );
    let text = combined_output(&output);
    assert!(
        text.contains("credentials") || text.contains("profile") || text.contains("config"),
        "Expected error mentioning missing credentials:\n{text}"
    );
}

#[test]
fn test_json_only_conflicts_with_html_only() {
    let output = graphly_cmd()
        .args(["report", "--json-only", "--html-only"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
}

#[test]
fn test_invalid_output_format() {
    let output = graphly_cmd()
        .args(["--output", "invalid", "licenses"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Config subcommands ──────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    graphly_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_profiles_no_config() {
    graphly_cmd()
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No profiles"));
}

#[test]
fn test_config_use_unknown_profile() {
    let output = graphly_cmd()
        .args(["config", "use", "nonexistent"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("nonexistent"),
        "Expected error naming the missing profile:\n{text}"
    );
}

#[test]
fn test_config_set_unknown_key() {
    let output = graphly_cmd()
        .args(["config", "set", "bogus_key", "value"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("tenant_id"),
        "Expected valid-key list in error:\n{text}"
    );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_report_flags_exist() {
    graphly_cmd()
        .args(["report", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--out-dir")
                .and(predicate::str::contains("--growth-rate"))
                .and(predicate::str::contains("--group-filter"))
                .and(predicate::str::contains("--skip-teams"))
                .and(predicate::str::contains("--json-only")),
        );
}

#[test]
fn test_usage_services_exist() {
    graphly_cmd()
        .args(["usage", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("mailbox")
                .and(predicate::str::contains("onedrive"))
                .and(predicate::str::contains("sharepoint"))
                .and(predicate::str::contains("summary")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    graphly_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles"))
                .and(predicate::str::contains("set-secret")),
        );
}
