use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AdminSubscriptionResponse, AdminSubscriptionRow, CreateSubscriptionRequest,
    SubscriptionRecord, SubscriptionResponse, SubscriptionStatus,
};
use crate::services::PricingService;

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, subscription_type, tier, frequency, status, \
     next_pickup_date, created_at";

#[derive(Clone)]
pub struct SubscriptionService {
    pool: DbPool,
    pricing_service: PricingService,
}

impl SubscriptionService {
    pub fn new(pool: DbPool, pricing_service: PricingService) -> Self {
        Self {
            pool,
            pricing_service,
        }
    }

    pub async fn create_subscription(
        &self,
        user_id: i64,
        request: CreateSubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        // The triple must resolve in the plan grid before anything is stored.
        self.pricing_service.lookup_plan(
            request.subscription_type,
            request.frequency,
            request.tier,
        )?;

        let pickup_date = NaiveDate::parse_from_str(&request.pickup_date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid pickup date format".to_string()))?;

        let result = sqlx::query(
            "INSERT INTO subscriptions (user_id, subscription_type, tier, frequency, status, \
                                        next_pickup_date) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(request.subscription_type)
        .bind(i64::from(request.tier))
        .bind(request.frequency)
        .bind(SubscriptionStatus::Active)
        .bind(pickup_date)
        .execute(&self.pool)
        .await?;

        let record = sqlx::query_as::<_, SubscriptionRecord>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = ?"
        ))
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await?;

        Ok(self.enrich(record))
    }

    pub async fn my_subscriptions(&self, user_id: i64) -> AppResult<Vec<SubscriptionResponse>> {
        let records = sqlx::query_as::<_, SubscriptionRecord>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(|r| self.enrich(r)).collect())
    }

    /// One conditional write keyed by id and owner. A row that is already
    /// cancelled still matches, so a repeat cancel succeeds quietly; a row
    /// that is missing or foreign reads as not found.
    pub async fn cancel(&self, subscription_id: i64, user_id: i64) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE subscriptions SET status = ? WHERE id = ? AND user_id = ?")
                .bind(SubscriptionStatus::Cancelled)
                .bind(subscription_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Subscription not found".to_string()));
        }
        Ok(())
    }

    pub async fn admin_list_subscriptions(&self) -> AppResult<Vec<AdminSubscriptionResponse>> {
        let rows = sqlx::query_as::<_, AdminSubscriptionRow>(
            "SELECT subscriptions.id, subscriptions.user_id, subscriptions.subscription_type, \
                    subscriptions.tier, subscriptions.frequency, subscriptions.status, \
                    subscriptions.next_pickup_date, subscriptions.created_at, \
                    users.first_name, users.last_name, users.email, users.phone, \
                    users.address, users.postcode \
             FROM subscriptions JOIN users ON subscriptions.user_id = users.id \
             ORDER BY subscriptions.created_at DESC, subscriptions.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AdminSubscriptionResponse {
                subscription: self.enrich(row.subscription),
                customer: row.customer,
            })
            .collect())
    }

    /// Price and description are resolved from the catalog at read time, not
    /// from a snapshot; a stored combination that no longer resolves shows a
    /// zero price and an empty description.
    fn enrich(&self, record: SubscriptionRecord) -> SubscriptionResponse {
        let plan = u8::try_from(record.tier).ok().and_then(|tier| {
            self.pricing_service
                .catalog()
                .lookup(record.subscription_type, record.frequency, tier)
        });

        SubscriptionResponse {
            id: record.id,
            subscription_type: record.subscription_type,
            tier: record.tier,
            frequency: record.frequency,
            status: record.status,
            next_pickup_date: record.next_pickup_date,
            created_at: record.created_at,
            price: plan.map(|p| p.price()).unwrap_or_else(|| Decimal::new(0, 2)),
            description: plan.map(|p| p.description.to_string()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SubscriptionCatalog;
    use crate::database::test_pool;
    use crate::models::{Frequency, SubscriptionType};

    async fn seed_user(pool: &DbPool, email: &str) -> i64 {
        sqlx::query(
            "INSERT INTO users (email, password_hash, first_name, last_name, postcode) \
             VALUES (?, 'x', 'Test', 'User', 'SW1A 1AA')",
        )
        .bind(email)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    async fn service() -> (SubscriptionService, DbPool) {
        let pool = test_pool().await;
        let pricing = PricingService::new(pool.clone(), SubscriptionCatalog::standard());
        (SubscriptionService::new(pool.clone(), pricing), pool)
    }

    fn laundry_weekly_tier_one() -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            subscription_type: SubscriptionType::Laundry,
            tier: 1,
            frequency: Frequency::Weekly,
            pickup_date: "2026-08-14".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_resolves_price_from_grid() {
        let (service, pool) = service().await;
        let user_id = seed_user(&pool, "owner@example.com").await;

        let subscription = service
            .create_subscription(user_id, laundry_weekly_tier_one())
            .await
            .unwrap();

        assert_eq!(subscription.status, SubscriptionStatus::Active);
        assert_eq!(subscription.price.to_string(), "15.99");
        assert_eq!(subscription.description, "1 bag per week");
        assert_eq!(
            subscription.next_pickup_date,
            Some(NaiveDate::from_ymd_opt(2026, 8, 14).unwrap())
        );
    }

    #[tokio::test]
    async fn test_invalid_combination_is_rejected_without_a_row() {
        let (service, pool) = service().await;
        let user_id = seed_user(&pool, "owner@example.com").await;

        let mut request = laundry_weekly_tier_one();
        request.tier = 4;

        assert!(matches!(
            service.create_subscription(user_id, request).await,
            Err(AppError::Validation(_))
        ));

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_double_cancel_is_allowed() {
        let (service, pool) = service().await;
        let user_id = seed_user(&pool, "owner@example.com").await;
        let subscription = service
            .create_subscription(user_id, laundry_weekly_tier_one())
            .await
            .unwrap();

        service.cancel(subscription.id, user_id).await.unwrap();
        // Second cancel still matches the row and succeeds.
        service.cancel(subscription.id, user_id).await.unwrap();

        let listed = service.my_subscriptions(user_id).await.unwrap();
        assert_eq!(listed[0].status, SubscriptionStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_of_foreign_or_missing_row_is_not_found() {
        let (service, pool) = service().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let stranger = seed_user(&pool, "stranger@example.com").await;
        let subscription = service
            .create_subscription(owner, laundry_weekly_tier_one())
            .await
            .unwrap();

        assert!(matches!(
            service.cancel(subscription.id, stranger).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.cancel(4242, owner).await,
            Err(AppError::NotFound(_))
        ));

        let listed = service.my_subscriptions(owner).await.unwrap();
        assert_eq!(listed[0].status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn test_listing_enriches_live_from_catalog() {
        let (service, pool) = service().await;
        let user_id = seed_user(&pool, "owner@example.com").await;
        service
            .create_subscription(user_id, laundry_weekly_tier_one())
            .await
            .unwrap();

        // A plan change between requests shows through immediately: simulate
        // one by storing a combination the catalog no longer carries.
        sqlx::query("UPDATE subscriptions SET tier = 9")
            .execute(&pool)
            .await
            .unwrap();

        let listed = service.my_subscriptions(user_id).await.unwrap();
        assert_eq!(listed[0].price.to_string(), "0.00");
        assert_eq!(listed[0].description, "");
    }

    #[tokio::test]
    async fn test_admin_listing_joins_owner_contact() {
        let (service, pool) = service().await;
        let user_id = seed_user(&pool, "owner@example.com").await;
        service
            .create_subscription(user_id, laundry_weekly_tier_one())
            .await
            .unwrap();

        let listed = service.admin_list_subscriptions().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer.email, "owner@example.com");
        assert_eq!(listed[0].subscription.price.to_string(), "15.99");
    }
}
