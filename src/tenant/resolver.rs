use std::sync::Mutex;

use serde::Serialize;

use crate::backend::BackendClient;
use crate::tenant::Tenant;

/// Normalized error value exposed to the rendering layer; the underlying
/// failure is logged, never surfaced raw.
pub const FETCH_FAILED: &str = "FETCH_FAILED";

/// Snapshot of one tenant viewing, as handed to the rendering layer
#[derive(Debug, Clone, Serialize)]
pub struct TenantView {
    pub tenant: Option<Tenant>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct ViewState {
    bound_id: Option<String>,
    tenant: Option<Tenant>,
    is_loading: bool,
    error: Option<String>,
}

impl ViewState {
    fn view(&self) -> TenantView {
        TenantView {
            tenant: self.tenant.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }
}

/// Fetches and holds one tenant's data for the lifetime of a viewing.
///
/// Overlapping fetches are not cancelled or sequence-guarded: completions are
/// applied in settle order, so the last write wins. The lock is never held
/// across the network await.
pub struct TenantResolver {
    backend: BackendClient,
    state: Mutex<ViewState>,
}

impl TenantResolver {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn snapshot(&self) -> TenantView {
        self.state.lock().expect("resolver state poisoned").view()
    }

    /// Bind the viewing to `tenant_id` and fetch its data.
    ///
    /// An absent id unbinds the viewing and makes no network call. On fetch
    /// failure the previous tenant data is kept; stale-but-present beats
    /// flashing to empty.
    pub async fn resolve(&self, tenant_id: Option<&str>) -> TenantView {
        let id = match tenant_id {
            Some(id) => id.to_string(),
            None => {
                let mut state = self.state.lock().expect("resolver state poisoned");
                *state = ViewState::default();
                return state.view();
            }
        };

        {
            let mut state = self.state.lock().expect("resolver state poisoned");
            state.bound_id = Some(id.clone());
            state.is_loading = true;
            state.error = None;
        }

        let result = self.backend.get_tenant(&id).await;

        let mut state = self.state.lock().expect("resolver state poisoned");
        match result {
            Ok(tenant) => {
                tracing::debug!("Resolved tenant {}", id);
                state.tenant = Some(tenant);
                state.error = None;
            }
            Err(e) => {
                tracing::error!("Failed to fetch tenant {}: {}", id, e);
                state.error = Some(FETCH_FAILED.to_string());
            }
        }
        state.is_loading = false;
        state.view()
    }

    /// Re-run the fetch against the currently bound id, with identical
    /// success and failure handling. No-op when nothing is bound.
    pub async fn refetch(&self) -> TenantView {
        let bound = {
            let state = self.state.lock().expect("resolver state poisoned");
            state.bound_id.clone()
        };

        match bound {
            Some(id) => self.resolve(Some(&id)).await,
            None => self.snapshot(),
        }
    }
}
