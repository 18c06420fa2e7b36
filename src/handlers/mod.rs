use axum::extract::{Path, State};

use crate::middleware::{ApiResponse, ApiResult};
use crate::notify::Notification;
use crate::state::AppState;
use crate::tenant::TenantView;

/// GET /api/tenants/:id - bind the tenant view to `id` and return its
/// snapshot. Re-requesting with a different id re-fetches; fetch failures
/// keep the previously shown data.
pub async fn tenant_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TenantView> {
    let view = state.tenant_view.resolve(Some(&id)).await;
    Ok(ApiResponse::success(view))
}

/// POST /api/tenants/view/refresh - re-fetch the currently bound tenant
pub async fn tenant_refresh(State(state): State<AppState>) -> ApiResult<TenantView> {
    let view = state.tenant_view.refetch().await;
    Ok(ApiResponse::success(view))
}

/// DELETE /api/tenants/view - unbind the tenant view (navigating away)
pub async fn tenant_close(State(state): State<AppState>) -> ApiResult<TenantView> {
    let view = state.tenant_view.resolve(None).await;
    Ok(ApiResponse::success(view))
}

/// GET /api/notifications - rendered notification feed for polling clients
pub async fn notifications(State(state): State<AppState>) -> ApiResult<Vec<Notification>> {
    Ok(ApiResponse::success(state.feed.snapshot()))
}
