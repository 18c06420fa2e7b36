pub mod resolver;

pub use resolver::{TenantResolver, TenantView};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tenant's representation as served by the platform backend.
///
/// Replaced wholesale on every successful fetch, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub plan: Option<String>,
    pub is_active: Option<bool>,
    pub document_count: Option<i64>,
    pub monthly_cost_cents: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
