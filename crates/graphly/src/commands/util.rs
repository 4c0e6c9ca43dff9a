//! Shared command helpers: token acquisition and client construction.

use graphly_api::{AuthMode, GraphClient, TokenProvider};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Resolve credentials, acquire a token, and build the Graph client.
///
/// Device-code sign-in prints the code and verification URL to stderr and
/// blocks until the operator completes it or the grant expires.
pub async fn connect(global: &GlobalOpts) -> Result<GraphClient, CliError> {
    let run = config::resolve_run_config(global)?;

    let http = run.transport.build_client()?;
    let mode = run.credentials.mode();
    let provider = TokenProvider::new(http, run.credentials);

    let token = match mode {
        AuthMode::ClientSecret => provider.acquire().await?,
        AuthMode::DeviceCode => {
            let grant = provider.start_device_code().await?;
            eprintln!(
                "To sign in, open {} and enter the code {}",
                grant.verification_uri, grant.user_code
            );
            provider.poll_device_code(&grant).await?
        }
    };

    Ok(GraphClient::from_token(&token, &run.transport)?)
}

/// Validate a `--period-days` value against the windows Graph offers.
pub fn validate_period(period_days: u32) -> Result<(), CliError> {
    const VALID: [u32; 4] = [7, 30, 90, 180];
    if VALID.contains(&period_days) {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "period-days".into(),
            reason: format!("must be one of 7, 30, 90, or 180, got {period_days}"),
        })
    }
}

/// Validate a `--growth-rate` value. Negative rates model shrinkage;
/// below -100% the projection would go negative.
pub fn validate_growth_rate(rate: i32) -> Result<(), CliError> {
    if rate >= graphly_core::growth::MIN_RATE {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "growth-rate".into(),
            reason: format!("must be at least -100 percent, got {rate}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_graph_windows_pass() {
        for days in [7, 30, 90, 180] {
            assert!(validate_period(days).is_ok());
        }
        for days in [0, 1, 45, 365] {
            assert!(validate_period(days).is_err());
        }
    }

    #[test]
    fn growth_floor_is_minus_one_hundred() {
        for rate in [-100, -5, 0, 30, 500] {
            assert!(validate_growth_rate(rate).is_ok());
        }
        assert!(validate_growth_rate(-101).is_err());
    }
}
