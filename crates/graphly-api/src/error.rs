use thiserror::Error;

/// Top-level error type for the `graphly-api` crate.
///
/// Covers every failure mode across the Graph surfaces used by the
/// assessment pipeline: token acquisition, transport, the OData error
/// envelope, and report deserialization. `graphly-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token request rejected (bad client secret, unknown tenant, consent
    /// missing, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Access token rejected by the Graph endpoint (expired or revoked).
    #[error("Access token rejected -- re-authentication required")]
    InvalidToken,

    /// Device-code flow is still pending user sign-in.
    #[error("Device-code sign-in not completed within {timeout_secs}s")]
    DeviceCodeTimeout { timeout_secs: u64 },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Graph API ───────────────────────────────────────────────────
    /// Structured error parsed from the OData error envelope.
    #[error("Graph API error (HTTP {status}): {message}")]
    Graph {
        message: String,
        code: Option<String>,
        status: u16,
    },

    /// Throttled by the service (HTTP 429).
    #[error("Throttled by Graph -- retry after {retry_after_secs}s")]
    Throttled { retry_after_secs: u64 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the token has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::InvalidToken)
    }

    /// Returns `true` if this failure should be treated as fatal setup
    /// (abort the whole run) rather than a per-service degradation.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::InvalidToken | Self::DeviceCodeTimeout { .. }
        )
    }

    /// Returns `true` if this is a "permission denied" response -- the
    /// caller lacks a Graph application role for this report surface.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Graph { status, .. } => *status == 403,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::FORBIDDEN),
            _ => false,
        }
    }

    /// Extract the OData error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Graph { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
