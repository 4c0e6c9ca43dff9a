//! Shared configuration for the graphly CLI.
//!
//! TOML profiles, credential resolution (keyring + env + plaintext), and
//! translation to `graphly_api` credential/transport types. The CLI adds
//! flag-override wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use graphly_api::{Credentials, TransportConfig};

/// Environment variable consulted for the client secret when the profile
/// does not name its own.
pub const CLIENT_SECRET_ENV: &str = "GRAPHLY_CLIENT_SECRET";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named tenant profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Custom growth scenario rate, percent (>= -100 for shrinkage).
    #[serde(default = "default_growth_rate")]
    pub growth_rate: i32,

    /// Trailing report window, days.
    #[serde(default = "default_period_days")]
    pub period_days: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            growth_rate: default_growth_rate(),
            period_days: default_period_days(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_growth_rate() -> i32 {
    30
}
fn default_period_days() -> u32 {
    180
}

/// A named tenant profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Entra tenant id (GUID or domain).
    pub tenant_id: Option<String>,

    /// App registration client id.
    pub client_id: Option<String>,

    /// Auth flow: "client-secret" or "device-code".
    #[serde(default = "default_auth")]
    pub auth: String,

    /// Client secret (plaintext -- prefer keyring or env var).
    pub client_secret: Option<String>,

    /// Environment variable name containing the client secret.
    pub client_secret_env: Option<String>,

    /// Path to a corporate-proxy CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Override request timeout, seconds.
    pub timeout: Option<u64>,
}

fn default_auth() -> String {
    "client-secret".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "graphly", "graphly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("graphly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("GRAPHLY_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the client secret from the credential chain.
///
/// Order: profile's named env var, [`CLIENT_SECRET_ENV`], the system
/// keyring, then plaintext in the config file.
pub fn resolve_client_secret(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.client_secret_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(val) = std::env::var(CLIENT_SECRET_ENV) {
        return Ok(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new("graphly", &format!("{profile_name}/client-secret")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(ref secret) = profile.client_secret {
        return Ok(SecretString::from(secret.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn require_field<'a>(
    value: &'a Option<String>,
    field: &str,
    profile_name: &str,
) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or_else(|| ConfigError::Validation {
        field: field.into(),
        reason: format!("missing for profile '{profile_name}'"),
    })
}

/// Resolve `Credentials` from a profile's `auth` field.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    let tenant_id = require_field(&profile.tenant_id, "tenant_id", profile_name)?.to_owned();
    let client_id = require_field(&profile.client_id, "client_id", profile_name)?.to_owned();

    match profile.auth.as_str() {
        "client-secret" => {
            let secret = resolve_client_secret(profile, profile_name)?;
            Ok(Credentials::ClientSecret {
                tenant_id,
                client_id,
                secret,
            })
        }
        "device-code" => Ok(Credentials::DeviceCode {
            tenant_id,
            client_id,
        }),
        other => Err(ConfigError::Validation {
            field: "auth".into(),
            reason: format!("expected 'client-secret' or 'device-code', got '{other}'"),
        }),
    }
}

/// Build a `TransportConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    TransportConfig {
        extra_ca: profile.ca_cert.clone(),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn profile(auth: &str) -> Profile {
        Profile {
            tenant_id: Some("contoso.onmicrosoft.com".into()),
            client_id: Some("11111111-2222-3333-4444-555555555555".into()),
            auth: auth.into(),
            client_secret: Some("s3cret".into()),
            client_secret_env: None,
            ca_cert: None,
            timeout: None,
        }
    }

    #[test]
    fn plaintext_secret_resolves_last() {
        let secret = resolve_client_secret(&profile("client-secret"), "work").expect("resolves");
        assert_eq!(secret.expose_secret(), "s3cret");
    }

    #[test]
    fn missing_tenant_id_is_a_validation_error() {
        let mut p = profile("client-secret");
        p.tenant_id = None;

        let err = resolve_credentials(&p, "work").expect_err("must fail");
        assert!(matches!(err, ConfigError::Validation { field, .. } if field == "tenant_id"));
    }

    #[test]
    fn unknown_auth_mode_is_rejected() {
        let err = resolve_credentials(&profile("managed-identity"), "work").expect_err("must fail");
        assert!(matches!(err, ConfigError::Validation { field, .. } if field == "auth"));
    }

    #[test]
    fn device_code_needs_no_secret() {
        let mut p = profile("device-code");
        p.client_secret = None;

        let creds = resolve_credentials(&p, "work").expect("resolves");
        assert!(matches!(creds, Credentials::DeviceCode { .. }));
    }

    #[test]
    fn transport_uses_profile_timeout_over_defaults() {
        let mut p = profile("client-secret");
        p.timeout = Some(90);

        let transport = profile_to_transport(&p, &Defaults::default());
        assert_eq!(transport.timeout, Duration::from_secs(90));
    }

    #[test]
    fn transport_falls_back_to_default_timeout() {
        let transport = profile_to_transport(&profile("client-secret"), &Defaults::default());
        assert_eq!(transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.profiles.insert("work".into(), profile("client-secret"));

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&text).expect("parse");
        assert_eq!(parsed.default_profile.as_deref(), Some("default"));
        assert!(parsed.profiles.contains_key("work"));
    }
}
