// Token acquisition against the Microsoft identity platform.
//
// Two flows: client-credentials (unattended service principal) and
// device-code (interactive operator sign-in). Both end in a bearer token
// that `GraphClient` injects as a default header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::Error;

/// Default authority host for token requests.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scope requested for application tokens -- Graph decides the effective
/// roles from the app registration's granted permissions.
const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Which authentication flow to use for a run.
///
/// Marker enum (no data) -- the actual credentials live in [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// OAuth2 client-credentials grant (tenant id + client id + secret).
    ClientSecret,
    /// OAuth2 device-code grant (interactive browser sign-in).
    DeviceCode,
}

/// Credentials for authenticating with the Microsoft identity platform.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Service-principal secret for the client-credentials grant.
    ClientSecret {
        tenant_id: String,
        client_id: String,
        secret: SecretString,
    },

    /// Public-client device-code flow. The operator completes sign-in at
    /// <https://microsoft.com/devicelogin> with the code we print.
    DeviceCode {
        tenant_id: String,
        client_id: String,
    },
}

impl Credentials {
    pub fn mode(&self) -> AuthMode {
        match self {
            Self::ClientSecret { .. } => AuthMode::ClientSecret,
            Self::DeviceCode { .. } => AuthMode::DeviceCode,
        }
    }

    fn tenant_id(&self) -> &str {
        match self {
            Self::ClientSecret { tenant_id, .. } | Self::DeviceCode { tenant_id, .. } => tenant_id,
        }
    }
}

// ── Wire shapes ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Response from the device-code initiation endpoint, surfaced to the CLI
/// so it can display the code and verification URL to the operator.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeGrant {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    /// Seconds between token polls.
    #[serde(default = "default_poll_interval")]
    pub interval: u64,
    /// Seconds until the device code expires.
    pub expires_in: u64,
}

fn default_poll_interval() -> u64 {
    5
}

/// A bearer token plus its lifetime. Tokens are held as secrets and only
/// exposed when building the Authorization header.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: SecretString,
    pub expires_in: Option<Duration>,
}

// ── Token provider ───────────────────────────────────────────────────

/// Acquires access tokens from the identity platform.
///
/// Holds its own plain `reqwest::Client`: token endpoints live on a
/// different host than Graph and need no default headers.
pub struct TokenProvider {
    http: reqwest::Client,
    authority: String,
    credentials: Credentials,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            http,
            authority: DEFAULT_AUTHORITY.to_owned(),
            credentials,
        }
    }

    /// Override the authority host (tests point this at a mock server).
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority,
            self.credentials.tenant_id()
        )
    }

    /// Acquire a token with the client-credentials grant.
    ///
    /// Fails with [`Error::Authentication`] for any identity-platform
    /// rejection -- the caller treats that as a fatal setup failure.
    pub async fn acquire(&self) -> Result<AccessToken, Error> {
        let Credentials::ClientSecret {
            client_id, secret, ..
        } = &self.credentials
        else {
            return Err(Error::Authentication {
                message: "client-credentials flow requires a client secret".into(),
            });
        };

        let url = self.token_url();
        debug!("POST {url} (client_credentials)");

        let resp = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", secret.expose_secret()),
                ("scope", GRAPH_DEFAULT_SCOPE),
            ])
            .send()
            .await?;

        Self::parse_token_response(resp).await
    }

    /// Start the device-code flow. Returns the grant so the caller can
    /// show `user_code` / `verification_uri` before polling.
    pub async fn start_device_code(&self) -> Result<DeviceCodeGrant, Error> {
        let Credentials::DeviceCode {
            tenant_id,
            client_id,
        } = &self.credentials
        else {
            return Err(Error::Authentication {
                message: "device-code flow requires device-code credentials".into(),
            });
        };

        let url = format!("{}/{}/oauth2/v2.0/devicecode", self.authority, tenant_id);
        debug!("POST {url} (devicecode)");

        let resp = self
            .http
            .post(&url)
            .form(&[
                ("client_id", client_id.as_str()),
                ("scope", GRAPH_DEFAULT_SCOPE),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_token_error(status, resp).await);
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Poll the token endpoint until the operator completes sign-in,
    /// the grant expires, or the platform rejects the request.
    pub async fn poll_device_code(&self, grant: &DeviceCodeGrant) -> Result<AccessToken, Error> {
        let Credentials::DeviceCode { client_id, .. } = &self.credentials else {
            return Err(Error::Authentication {
                message: "device-code flow requires device-code credentials".into(),
            });
        };

        let url = self.token_url();
        let deadline = std::time::Instant::now() + Duration::from_secs(grant.expires_in);
        let interval = Duration::from_secs(grant.interval.max(1));

        loop {
            if std::time::Instant::now() >= deadline {
                return Err(Error::DeviceCodeTimeout {
                    timeout_secs: grant.expires_in,
                });
            }

            let resp = self
                .http
                .post(&url)
                .form(&[
                    ("grant_type", "urn:ietf:params:oauth:grant-type:device_code"),
                    ("client_id", client_id.as_str()),
                    ("device_code", grant.device_code.as_str()),
                ])
                .send()
                .await?;

            let status = resp.status();
            if status.is_success() {
                return Self::parse_token_response(resp).await;
            }

            let raw = resp.text().await.unwrap_or_default();
            let err: TokenErrorResponse = serde_json::from_str(&raw).unwrap_or(TokenErrorResponse {
                error: None,
                error_description: None,
            });
            match err.error.as_deref() {
                // Operator has not finished signing in yet.
                Some("authorization_pending") | Some("slow_down") => {
                    tokio::time::sleep(interval).await;
                }
                _ => {
                    return Err(Error::Authentication {
                        message: err
                            .error_description
                            .or(err.error)
                            .unwrap_or_else(|| status.to_string()),
                    });
                }
            }
        }
    }

    async fn parse_token_response(resp: reqwest::Response) -> Result<AccessToken, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            let token: TokenResponse =
                serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body,
                })?;
            Ok(AccessToken {
                token: SecretString::from(token.access_token),
                expires_in: token.expires_in.map(Duration::from_secs),
            })
        } else {
            Err(Self::parse_token_error(status, resp).await)
        }
    }

    async fn parse_token_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        if let Ok(err) = serde_json::from_str::<TokenErrorResponse>(&raw) {
            Error::Authentication {
                message: err
                    .error_description
                    .or(err.error)
                    .unwrap_or_else(|| status.to_string()),
            }
        } else {
            Error::Authentication {
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            }
        }
    }
}
