//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and config errors into user-facing errors with
//! actionable help text and exit codes.

use miette::Diagnostic;
use thiserror::Error;

use graphly_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(graphly::auth_failed),
        help(
            "Verify the tenant id, client id, and secret for the app registration.\n\
             Run: graphly config set-secret --profile <name>\n\
             The app needs Reports.Read.All, Directory.Read.All, and Group.Read.All."
        )
    )]
    AuthFailed { message: String },

    #[error("Access token was rejected during collection")]
    #[diagnostic(
        code(graphly::token_rejected),
        help("The token expired or was revoked mid-run. Re-run the command to re-authenticate.")
    )]
    TokenRejected,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(graphly::no_credentials),
        help(
            "Configure credentials with: graphly config init\n\
             Or set GRAPHLY_TENANT_ID, GRAPHLY_CLIENT_ID, and GRAPHLY_CLIENT_SECRET."
        )
    )]
    NoCredentials { profile: String },

    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the Microsoft Graph endpoint")]
    #[diagnostic(
        code(graphly::connection_failed),
        help(
            "Check network connectivity and proxy settings.\n\
             Behind a TLS-intercepting proxy, configure ca_cert in your profile."
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(graphly::timeout),
        help("Increase the timeout with --timeout or retry with a shorter --period-days.")
    )]
    Timeout,

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(graphly::validation))]
    Validation { field: String, reason: String },

    #[error("Group '{name}' not found in tenant")]
    #[diagnostic(
        code(graphly::group_not_found),
        help("Check the group's display name; --group-filter matches it exactly.")
    )]
    GroupNotFound { name: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Graph API error ({code}): {message}")]
    #[diagnostic(code(graphly::api_error))]
    ApiError { code: String, message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(graphly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: graphly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(graphly::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(graphly::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::TokenRejected | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::GroupNotFound { .. }
            | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::TokenRejected => CliError::TokenRejected,

            CoreError::GroupNotFound { name } => CliError::GroupNotFound { name },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api(api) => CliError::from(api),
        }
    }
}

impl From<graphly_api::Error> for CliError {
    fn from(err: graphly_api::Error) -> Self {
        match err {
            graphly_api::Error::Authentication { message } => CliError::AuthFailed { message },

            graphly_api::Error::InvalidToken => CliError::TokenRejected,

            graphly_api::Error::DeviceCodeTimeout { timeout_secs } => CliError::AuthFailed {
                message: format!("device-code sign-in timed out after {timeout_secs}s"),
            },

            graphly_api::Error::Transport(re) => {
                if re.is_timeout() {
                    CliError::Timeout
                } else if re.is_connect() {
                    CliError::ConnectionFailed { source: re.into() }
                } else {
                    CliError::ApiError {
                        code: "transport".into(),
                        message: re.to_string(),
                    }
                }
            }

            graphly_api::Error::Throttled { retry_after_secs } => CliError::ApiError {
                code: "throttled".into(),
                message: format!("Graph asked to retry after {retry_after_secs}s"),
            },

            graphly_api::Error::Graph {
                message, code, ..
            } => CliError::ApiError {
                code: code.unwrap_or_default(),
                message,
            },

            other => CliError::ApiError {
                code: "api".into(),
                message: other.to_string(),
            },
        }
    }
}

impl From<graphly_config::ConfigError> for CliError {
    fn from(err: graphly_config::ConfigError) -> Self {
        match err {
            graphly_config::ConfigError::NoCredentials { profile } => {
                CliError::NoCredentials { profile }
            }
            graphly_config::ConfigError::Validation { field, reason } => {
                CliError::Validation { field, reason }
            }
            graphly_config::ConfigError::Figment(e) => CliError::Config(e),
            graphly_config::ConfigError::Io(e) => CliError::Io(e),
            graphly_config::ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
        }
    }
}
