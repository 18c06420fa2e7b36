use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::backend::{BackendClient, BackendError, ForwardedResponse, REINDEX_ROUTE};
use crate::error::ApiError;
use crate::notify::FinishKind;
use crate::state::AppState;

/// Credential the browser supplies; forwarded to the backend and nowhere else
pub const API_KEY_HEADER: &str = "x-api-key";

/// POST /api/proxy/reindex?tenant_id=<id> - forward a reindex request to the
/// platform backend and relay its answer.
///
/// The endpoint mutates no local state beyond the progress notification; it
/// is a pure forward-and-relay. Backend responses, success or structured
/// error, pass through with status and body untouched. Only a transport-level
/// failure is translated, into a synthetic 500.
pub async fn reindex(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Required tenant scoping, checked before any network call
    let query = raw_query.as_deref().unwrap_or("");
    let tenant_id = match query_param(query, "tenant_id") {
        Some(id) if !id.is_empty() => id,
        _ => return ApiError::missing_field("tenant_id").into_response(),
    };

    // Scalar or first of a repeated header; no other credential source is
    // consulted.
    let api_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());

    // Backend base re-resolved from the injected config on every request
    let backend = match BackendClient::new(state.config.backend_base_url()) {
        Ok(backend) => backend,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let note = state
        .notifier
        .start(&format!("Reindexing documents for tenant {}...", tenant_id))
        .await;

    match backend.forward_post(REINDEX_ROUTE, raw_query.as_deref(), api_key, body).await {
        Ok(forwarded) => {
            if forwarded.is_success() {
                state
                    .notifier
                    .finish(note, "Document reindex started", FinishKind::Success)
                    .await;

                // Refresh the tenant view behind the response; completions
                // apply in settle order, last write wins.
                let view = state.tenant_view.clone();
                tokio::spawn(async move {
                    view.refetch().await;
                });
            } else {
                tracing::warn!(
                    "Backend rejected reindex for tenant {}: status {}",
                    tenant_id,
                    forwarded.status
                );
                state
                    .notifier
                    .finish(note, "Document reindex failed", FinishKind::Error)
                    .await;
            }

            relay(forwarded)
        }
        Err(e) => {
            tracing::error!("Reindex forward failed for tenant {}: {}", tenant_id, e);
            state
                .notifier
                .finish(note, "Document reindex failed", FinishKind::Error)
                .await;

            let detail = match e {
                BackendError::Transport(detail) => Some(detail),
                other => Some(other.to_string()),
            };
            ApiError::upstream_unavailable("Backend service unreachable", detail).into_response()
        }
    }
}

/// Explicit 405 for non-POST calls to the proxy path; nothing is forwarded.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Proxy endpoint only accepts POST")
}

fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key.as_ref() == name)
        .map(|(_, value)| value.into_owned())
}

fn relay(forwarded: ForwardedResponse) -> Response {
    let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = forwarded
        .content_type
        .unwrap_or_else(|| "application/json".to_string());

    (status, [(header::CONTENT_TYPE, content_type)], forwarded.body).into_response()
}
