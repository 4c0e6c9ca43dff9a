//! CLI configuration -- thin wrapper around `graphly_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--tenant-id, --client-secret,
//! --auth, etc.).

use secrecy::SecretString;

use graphly_api::{Credentials, TransportConfig};

use crate::cli::{AuthFlow, GlobalOpts};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use graphly_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, profile_to_transport,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// A run's resolved connection settings: credentials plus transport.
pub struct RunConfig {
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

/// Resolve credentials and transport from config file + CLI overrides.
///
/// Flags override profile values field by field; a run with no profile at
/// all can still work from `--tenant-id` / `--client-id` /
/// `--client-secret` (or their env vars).
pub fn resolve_run_config(global: &GlobalOpts) -> Result<RunConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    // Start from the profile when one exists, else an empty one that the
    // flags must fill in.
    let base = cfg.profiles.get(&profile_name);
    let mut effective = Profile {
        tenant_id: base.and_then(|p| p.tenant_id.clone()),
        client_id: base.and_then(|p| p.client_id.clone()),
        auth: base.map_or_else(|| "client-secret".into(), |p| p.auth.clone()),
        client_secret: base.and_then(|p| p.client_secret.clone()),
        client_secret_env: base.and_then(|p| p.client_secret_env.clone()),
        ca_cert: base.and_then(|p| p.ca_cert.clone()),
        timeout: base.and_then(|p| p.timeout),
    };

    if let Some(ref tenant) = global.tenant_id {
        effective.tenant_id = Some(tenant.clone());
    }
    if let Some(ref client) = global.client_id {
        effective.client_id = Some(client.clone());
    }
    if let Some(auth) = global.auth {
        effective.auth = match auth {
            AuthFlow::ClientSecret => "client-secret".into(),
            AuthFlow::DeviceCode => "device-code".into(),
        };
    }
    if let Some(ref ca) = global.ca_cert {
        effective.ca_cert = Some(ca.clone());
    }
    // Timeout layers flag > profile > config defaults.
    if let Some(timeout) = global.timeout {
        effective.timeout = Some(timeout);
    }

    let credentials = if let Some(ref secret) = global.client_secret {
        // Flag/env secret short-circuits the keyring chain.
        let tenant_id = effective
            .tenant_id
            .clone()
            .ok_or_else(|| CliError::NoCredentials {
                profile: profile_name.clone(),
            })?;
        let client_id = effective
            .client_id
            .clone()
            .ok_or_else(|| CliError::NoCredentials {
                profile: profile_name.clone(),
            })?;
        match effective.auth.as_str() {
            "device-code" => Credentials::DeviceCode {
                tenant_id,
                client_id,
            },
            _ => Credentials::ClientSecret {
                tenant_id,
                client_id,
                secret: SecretString::from(secret.clone()),
            },
        }
    } else {
        graphly_config::resolve_credentials(&effective, &profile_name).map_err(|e| match e {
            // A run with neither profile nor flags reads better as
            // "no credentials" than as a field-level validation error.
            graphly_config::ConfigError::Validation { .. } if base.is_none() => {
                CliError::NoCredentials {
                    profile: profile_name.clone(),
                }
            }
            other => other.into(),
        })?
    };

    let transport = profile_to_transport(&effective, &cfg.defaults);

    Ok(RunConfig {
        credentials,
        transport,
    })
}
