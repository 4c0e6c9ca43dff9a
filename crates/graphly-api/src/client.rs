// Hand-crafted async HTTP client for the Microsoft Graph v1.0 surface
// used by the assessment pipeline.
//
// Base path: https://graph.microsoft.com/v1.0/
// Auth: Authorization: Bearer header
//
// Every endpoint here is a read-only GET -- the client never mutates
// tenant state.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::auth::AccessToken;
use crate::{Error, types};

/// Public Graph endpoint.
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0/";

/// Page size for collection queries (Graph caps `$top` at 999 for users).
const PAGE_SIZE: u32 = 999;

/// Async client for the Microsoft Graph usage-reporting surface.
///
/// Uses bearer-token authentication and communicates via JSON REST
/// endpoints under `/v1.0/`.
pub struct GraphClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GraphClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an acquired access token and transport config.
    ///
    /// Injects `Authorization: Bearer ...` as a default header on every
    /// request, marked sensitive so it never appears in logs.
    pub fn from_token(
        token: &AccessToken,
        transport: &crate::TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let value = format!("Bearer {}", token.token.expose_secret());
        let mut auth_value = HeaderValue::from_str(&value).map_err(|e| Error::Authentication {
            message: format!("invalid bearer token header value: {e}"),
        })?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Url::parse(DEFAULT_BASE_URL)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` against an explicit base URL
    /// (caller manages auth headers). Used by tests against a mock server.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let raw = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{base_url}/")
        };
        Ok(Self {
            http,
            base_url: Url::parse(&raw)?,
        })
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"subscribedSkus"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    /// `$count` queries require the `ConsistencyLevel: eventual` header.
    async fn get_with_consistency<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?} (eventual consistency)");

        let resp = self
            .http
            .get(url)
            .query(params)
            .header("ConsistencyLevel", "eventual")
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// Follow an absolute `@odata.nextLink` URL.
    async fn get_absolute<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        debug!("GET {url} (nextLink)");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidToken;
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(30);
            return Error::Throttled { retry_after_secs };
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<types::OdataError>(&raw) {
            Error::Graph {
                status: status.as_u16(),
                message: err.error.message.unwrap_or_else(|| status.to_string()),
                code: err.error.code,
            }
        } else {
            Error::Graph {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ── Pagination helper ────────────────────────────────────────────

    /// Collect all pages of a collection query into a single `Vec<T>`,
    /// following `@odata.nextLink` until exhausted.
    pub async fn paginate_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let mut page: types::OdataPage<T> = self.get_with_params(path, params).await?;
        let mut all = page.value;

        while let Some(next) = page.next_link.take() {
            page = self.get_absolute(&next).await?;
            all.append(&mut page.value);
        }

        Ok(all)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Organization ─────────────────────────────────────────────────

    /// The tenant's organization profile (the collection holds exactly
    /// one entry for the authenticated tenant).
    pub async fn get_organization(&self) -> Result<types::Organization, Error> {
        let page: types::OdataPage<types::Organization> = self.get("organization").await?;
        page.value.into_iter().next().ok_or_else(|| Error::Graph {
            status: 200,
            message: "organization collection was empty".into(),
            code: None,
        })
    }

    // ── Users ────────────────────────────────────────────────────────

    /// All users with the flags the pipeline needs (enabled, guest).
    pub async fn list_users(&self) -> Result<Vec<types::User>, Error> {
        self.paginate_all(
            "users",
            &[
                (
                    "$select",
                    "id,displayName,userPrincipalName,accountEnabled,userType".into(),
                ),
                ("$top", PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    /// Users who are members of a specific group (group-scope filter).
    pub async fn list_group_member_users(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<types::User>, Error> {
        self.paginate_all(
            &format!("groups/{group_id}/members/microsoft.graph.user"),
            &[
                (
                    "$select",
                    "id,displayName,userPrincipalName,accountEnabled,userType".into(),
                ),
                ("$top", PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    /// Resolve a group by display name. Returns the first match.
    pub async fn find_group_by_name(&self, name: &str) -> Result<Option<types::Group>, Error> {
        let escaped = name.replace('\'', "''");
        let page: types::OdataPage<types::Group> = self
            .get_with_params(
                "groups",
                &[("$filter", format!("displayName eq '{escaped}'"))],
            )
            .await?;
        Ok(page.value.into_iter().next())
    }

    // ── License SKUs ─────────────────────────────────────────────────

    pub async fn list_subscribed_skus(&self) -> Result<Vec<types::SubscribedSku>, Error> {
        self.paginate_all("subscribedSkus", &[]).await
    }

    // ── Usage-detail reports ─────────────────────────────────────────

    /// Per-mailbox usage rows for the trailing `period_days` window.
    pub async fn get_mailbox_usage_detail(
        &self,
        period_days: u32,
    ) -> Result<Vec<types::MailboxUsageRow>, Error> {
        self.paginate_all(
            &format!("reports/getMailboxUsageDetail(period='D{period_days}')"),
            &[("$format", "application/json".into())],
        )
        .await
    }

    /// Per-drive usage rows (OneDrive accounts).
    pub async fn get_drive_usage_detail(
        &self,
        period_days: u32,
    ) -> Result<Vec<types::DriveUsageRow>, Error> {
        self.paginate_all(
            &format!("reports/getOneDriveUsageAccountDetail(period='D{period_days}')"),
            &[("$format", "application/json".into())],
        )
        .await
    }

    /// Per-site usage rows (SharePoint).
    pub async fn get_site_usage_detail(
        &self,
        period_days: u32,
    ) -> Result<Vec<types::SiteUsageRow>, Error> {
        self.paginate_all(
            &format!("reports/getSharePointSiteUsageDetail(period='D{period_days}')"),
            &[("$format", "application/json".into())],
        )
        .await
    }

    // ── Groups & Teams counts ────────────────────────────────────────

    /// Total Microsoft 365 group count.
    pub async fn count_groups(&self) -> Result<u64, Error> {
        let page: types::OdataPage<types::Group> = self
            .get_with_consistency(
                "groups",
                &[
                    ("$count", "true".into()),
                    ("$top", "1".into()),
                    ("$select", "id".into()),
                ],
            )
            .await?;
        Ok(u64::try_from(page.count.unwrap_or(0)).unwrap_or(0))
    }

    /// Count of Teams-enabled groups.
    pub async fn count_teams(&self) -> Result<u64, Error> {
        let page: types::OdataPage<types::Group> = self
            .get_with_consistency(
                "groups",
                &[
                    (
                        "$filter",
                        "resourceProvisioningOptions/Any(x:x eq 'Team')".into(),
                    ),
                    ("$count", "true".into()),
                    ("$top", "1".into()),
                    ("$select", "id".into()),
                ],
            )
            .await?;
        Ok(u64::try_from(page.count.unwrap_or(0)).unwrap_or(0))
    }

    /// First `limit` groups, used to pick a planner sample.
    pub async fn list_groups(&self, limit: u32) -> Result<Vec<types::Group>, Error> {
        let page: types::OdataPage<types::Group> = self
            .get_with_params(
                "groups",
                &[
                    (
                        "$select",
                        "id,displayName,resourceProvisioningOptions".into(),
                    ),
                    ("$top", limit.to_string()),
                ],
            )
            .await?;
        Ok(page.value)
    }

    // ── Planner ──────────────────────────────────────────────────────

    /// Planner plans owned by a group.
    pub async fn list_planner_plans(
        &self,
        group_id: &Uuid,
    ) -> Result<Vec<types::PlannerPlan>, Error> {
        let page: types::OdataPage<types::PlannerPlan> =
            self.get(&format!("groups/{group_id}/planner/plans")).await?;
        Ok(page.value)
    }
}
