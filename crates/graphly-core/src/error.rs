use thiserror::Error;

/// Error type for the assessment pipeline.
///
/// Only *fatal setup* conditions surface here; per-service collection
/// failures degrade that section to unavailable instead of erroring.
/// The CLI maps these into diagnostics.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Token acquisition failed before collection started.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The access token was rejected mid-run. Re-running is the fix;
    /// partial results would mix tenants of trust, so this aborts.
    #[error("Access token rejected during collection")]
    TokenRejected,

    /// The operator-supplied scope group does not exist.
    #[error("Group '{name}' not found in tenant")]
    GroupNotFound { name: String },

    /// Invalid operator input (rates, periods, paths).
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Unrecoverable Graph failure outside the per-service recovery path.
    #[error("Graph API error: {0}")]
    Api(#[source] graphly_api::Error),
}

impl From<graphly_api::Error> for CoreError {
    fn from(err: graphly_api::Error) -> Self {
        match err {
            graphly_api::Error::Authentication { message } => {
                Self::AuthenticationFailed { message }
            }
            graphly_api::Error::InvalidToken => Self::TokenRejected,
            graphly_api::Error::DeviceCodeTimeout { timeout_secs } => Self::AuthenticationFailed {
                message: format!("device-code sign-in timed out after {timeout_secs}s"),
            },
            other => Self::Api(other),
        }
    }
}
