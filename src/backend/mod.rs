use axum::body::Bytes;
use once_cell::sync::Lazy;
use url::Url;

use crate::tenant::Tenant;

/// Shared outbound HTTP client. Connection pooling lives here; per-request
/// callers construct a cheap `BackendClient` around it so the base address
/// is re-resolved from configuration on every call.
static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Route the proxy forwards reindex requests to
pub const REINDEX_ROUTE: &str = "admin/reindex-all";

/// Route tenant data is fetched from, suffixed with the tenant id
pub const TENANT_ROUTE: &str = "admin/tenants";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// No response obtained at all: timeout, refused connection, DNS failure
    #[error("backend unreachable: {0}")]
    Transport(String),
    /// The backend responded, but with a non-2xx status
    #[error("backend returned status {status}")]
    Status { status: u16, body: serde_json::Value },
    #[error("invalid backend payload: {0}")]
    Decode(String),
    #[error("invalid backend base URL: {0}")]
    InvalidBaseUrl(String),
}

/// A backend response relayed without re-interpretation
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ForwardedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin client over the platform backend, bound to one resolved base address.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn route_url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), route)
    }

    /// Fetch one tenant's representation from the backend
    pub async fn get_tenant(&self, tenant_id: &str) -> Result<Tenant, BackendError> {
        let url = format!("{}/{}", self.route_url(TENANT_ROUTE), tenant_id);

        let response = HTTP
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json().await.unwrap_or(serde_json::Value::Null);
            return Err(BackendError::Status { status: status.as_u16(), body });
        }

        response
            .json::<Tenant>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Liveness probe against the backend's health endpoint
    pub async fn ping(&self) -> Result<(), BackendError> {
        let url = self.route_url("health");

        let response = HTTP
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status { status: status.as_u16(), body: serde_json::Value::Null });
        }
        Ok(())
    }

    /// Forward a POST to the backend and hand back whatever it answered.
    ///
    /// Any response, 2xx or not, is an `Ok` here: the caller relays status and
    /// body verbatim. Only a transport-level failure (no response at all)
    /// surfaces as `Err`.
    pub async fn forward_post(
        &self,
        route: &str,
        raw_query: Option<&str>,
        api_key: Option<&str>,
        body: Bytes,
    ) -> Result<ForwardedResponse, BackendError> {
        let mut url = self.route_url(route);
        if let Some(query) = raw_query {
            url.push('?');
            url.push_str(query);
        }

        let mut request = HTTP
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(key) = api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(ForwardedResponse { status, content_type, body })
    }
}
