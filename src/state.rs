use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::AppConfig;
use crate::notify::{NotificationFeed, ProgressNotifier};
use crate::tenant::TenantResolver;

/// Shared application state, injected into handlers and middleware.
///
/// The notifier registry and tenant view live here rather than in globals so
/// tests can build isolated instances.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub notifier: Arc<ProgressNotifier>,
    pub feed: Arc<NotificationFeed>,
    pub tenant_view: Arc<TenantResolver>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let feed = Arc::new(NotificationFeed::new());
        let notifier = Arc::new(ProgressNotifier::new(feed.clone()));
        let backend = BackendClient::new(config.backend_base_url())?;

        Ok(Self {
            config: Arc::new(config),
            notifier,
            feed,
            tenant_view: Arc::new(TenantResolver::new(backend)),
        })
    }
}
