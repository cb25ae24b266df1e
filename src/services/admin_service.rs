use crate::database::DbPool;
use crate::error::AppResult;
use crate::models::{DashboardStats, OrderStatus, SubscriptionStatus, User, UserResponse};

#[derive(Clone)]
pub struct AdminService {
    pool: DbPool,
}

impl AdminService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Four independent counts, computed fresh per request. They may observe
    /// interleaved writes; the dashboard does not need an atomic snapshot.
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        let total_orders = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        let active_subscriptions =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE status = ?")
                .bind(SubscriptionStatus::Active)
                .fetch_one(&self.pool)
                .await?;

        let total_customers =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_admin = 0")
                .fetch_one(&self.pool)
                .await?;

        let pending_orders =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = ?")
                .bind(OrderStatus::Pending)
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            total_orders,
            active_subscriptions,
            total_customers,
            pending_orders,
        })
    }

    pub async fn customers(&self) -> AppResult<Vec<UserResponse>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, first_name, last_name, phone, address, postcode, \
                    is_admin, created_at \
             FROM users WHERE is_admin = 0 ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}
