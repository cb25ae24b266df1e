use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Dashboard counts. Each is queried independently per request; the four
/// values are not an atomic snapshot.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_orders: i64,
    pub active_subscriptions: i64,
    pub total_customers: i64,
    pub pending_orders: i64,
}
