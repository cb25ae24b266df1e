use chrono::NaiveDate;

use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AdminOrderResponse, AdminOrderRow, AdminUpdateOrderRequest, CreateOrderRequest, OrderRecord,
    OrderResponse, OrderStatus,
};
use crate::services::PricingService;

const ORDER_COLUMNS: &str = "id, user_id, order_type, items, total_price_pence, pickup_date, \
     delivery_date, status, subscription_id, special_instructions, created_at";

#[derive(Clone)]
pub struct OrderService {
    pool: DbPool,
    pricing_service: PricingService,
}

impl OrderService {
    pub fn new(pool: DbPool, pricing_service: PricingService) -> Self {
        Self {
            pool,
            pricing_service,
        }
    }

    /// Line items and the total are computed here from the pricing catalog;
    /// the stored total is authoritative, not client-supplied.
    pub async fn create_order(
        &self,
        user_id: i64,
        request: CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        let order_type = request.order_type.trim();
        if order_type.is_empty() {
            return Err(AppError::Validation("Order type is required".to_string()));
        }
        let pickup_date = NaiveDate::parse_from_str(&request.pickup_date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid pickup date format".to_string()))?;

        let quote = self.pricing_service.compute_order(&request.selections).await?;
        let items_json = serde_json::to_string(&quote.line_items)?;

        let result = sqlx::query(
            "INSERT INTO orders (user_id, order_type, items, total_price_pence, pickup_date, \
                                 status, subscription_id, special_instructions) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(order_type)
        .bind(&items_json)
        .bind(quote.total_pence)
        .bind(pickup_date)
        .bind(OrderStatus::Pending)
        .bind(request.subscription_id)
        .bind(&request.special_instructions)
        .execute(&self.pool)
        .await?;

        self.get_order(result.last_insert_rowid(), user_id).await
    }

    pub async fn my_orders(&self, user_id: i64) -> AppResult<Vec<OrderResponse>> {
        let orders = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        orders.into_iter().map(OrderRecord::into_response).collect()
    }

    /// Ownership is part of the key: an order that exists but belongs to
    /// someone else reads as not found.
    pub async fn get_order(&self, order_id: i64, user_id: i64) -> AppResult<OrderResponse> {
        sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? AND user_id = ?"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?
        .into_response()
    }

    /// Owner-scoped status update, a single conditional write.
    pub async fn update_status(
        &self,
        order_id: i64,
        user_id: i64,
        status: OrderStatus,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND user_id = ?")
            .bind(status)
            .bind(order_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order not found".to_string()));
        }
        Ok(())
    }

    pub async fn admin_list_orders(&self) -> AppResult<Vec<AdminOrderResponse>> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(
            "SELECT orders.id, orders.user_id, orders.order_type, orders.items, \
                    orders.total_price_pence, orders.pickup_date, orders.delivery_date, \
                    orders.status, orders.subscription_id, orders.special_instructions, \
                    orders.created_at, \
                    users.first_name, users.last_name, users.email, users.phone, \
                    users.address, users.postcode \
             FROM orders JOIN users ON orders.user_id = users.id \
             ORDER BY orders.created_at DESC, orders.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AdminOrderRow::into_response).collect()
    }

    /// Admin write keyed by id alone; optionally sets the delivery date in
    /// the same statement.
    pub async fn admin_update_order(
        &self,
        order_id: i64,
        request: AdminUpdateOrderRequest,
    ) -> AppResult<()> {
        let delivery_date = request
            .delivery_date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| AppError::Validation("Invalid delivery date format".to_string()))
            })
            .transpose()?;

        let result = match delivery_date {
            Some(date) => {
                sqlx::query("UPDATE orders SET status = ?, delivery_date = ? WHERE id = ?")
                    .bind(request.status)
                    .bind(date)
                    .bind(order_id)
                    .execute(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
                    .bind(request.status)
                    .bind(order_id)
                    .execute(&self.pool)
                    .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SubscriptionCatalog;
    use crate::database::test_pool;
    use std::collections::BTreeMap;

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

    async fn service() -> (OrderService, DbPool) {
        let pool = test_pool().await;
        let pricing = PricingService::new(pool.clone(), SubscriptionCatalog::standard());
        (OrderService::new(pool.clone(), pricing), pool)
    }

    async fn shirt_and_trousers(service: &OrderService) -> BTreeMap<i64, u32> {
        let items = service.pricing_service.list_items().await.unwrap();
        let id_of = |name: &str| {
            items
                .iter()
                .find(|i| i.item_name == name)
                .expect("seeded item")
                .id
        };
        BTreeMap::from([(id_of("Shirt"), 2), (id_of("Trousers"), 1)])
    }

    fn create_request(selections: BTreeMap<i64, u32>) -> CreateOrderRequest {
        CreateOrderRequest {
            order_type: "dry_cleaning".to_string(),
            selections,
            pickup_date: "2026-08-14".to_string(),
            special_instructions: Some("Ring the bell twice".to_string()),
            subscription_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_order_computes_total_server_side() {
        let (service, pool) = service().await;
        let user_id = seed_user(&pool, "owner@example.com").await;

        let selections = shirt_and_trousers(&service).await;
        let order = service
            .create_order(user_id, create_request(selections))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price.to_string(), "12.00");
        assert_eq!(order.items.len(), 2);
        assert!(order.delivery_date.is_none());
        assert_eq!(
            order.special_instructions.as_deref(),
            Some("Ring the bell twice")
        );
    }

    #[tokio::test]
    async fn test_create_order_rejects_bad_pickup_date() {
        let (service, pool) = service().await;
        let user_id = seed_user(&pool, "owner@example.com").await;
        let selections = shirt_and_trousers(&service).await;

        let mut request = create_request(selections);
        request.pickup_date = "14/08/2026".to_string();

        assert!(matches!(
            service.create_order(user_id, request).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_my_orders_newest_first_and_owner_scoped() {
        let (service, pool) = service().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let other = seed_user(&pool, "other@example.com").await;

        let selections = shirt_and_trousers(&service).await;
        let first = service
            .create_order(owner, create_request(selections.clone()))
            .await
            .unwrap();
        let second = service
            .create_order(owner, create_request(selections.clone()))
            .await
            .unwrap();
        service
            .create_order(other, create_request(selections))
            .await
            .unwrap();

        let orders = service.my_orders(owner).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.id);
        assert_eq!(orders[1].id, first.id);
    }

    #[tokio::test]
    async fn test_foreign_order_reads_as_not_found() {
        let (service, pool) = service().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let stranger = seed_user(&pool, "stranger@example.com").await;

        let selections = shirt_and_trousers(&service).await;
        let order = service
            .create_order(owner, create_request(selections))
            .await
            .unwrap();

        assert!(matches!(
            service.get_order(order.id, stranger).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service
                .update_status(order.id, stranger, OrderStatus::Cancelled)
                .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_can_set_every_status_exactly() {
        let (service, pool) = service().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let selections = shirt_and_trousers(&service).await;
        let order = service
            .create_order(owner, create_request(selections))
            .await
            .unwrap();

        for status in [
            OrderStatus::PickedUp,
            OrderStatus::Processing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Pending,
        ] {
            service
                .admin_update_order(
                    order.id,
                    AdminUpdateOrderRequest {
                        status,
                        delivery_date: None,
                    },
                )
                .await
                .unwrap();

            let read_back = service.get_order(order.id, owner).await.unwrap();
            assert_eq!(read_back.status, status);
        }
    }

    #[tokio::test]
    async fn test_admin_delivery_update_visible_to_owner_and_admin() {
        let (service, pool) = service().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let selections = shirt_and_trousers(&service).await;
        let order = service
            .create_order(owner, create_request(selections))
            .await
            .unwrap();

        service
            .admin_update_order(
                order.id,
                AdminUpdateOrderRequest {
                    status: OrderStatus::Delivered,
                    delivery_date: Some("2026-08-16".to_string()),
                },
            )
            .await
            .unwrap();

        let admin_view = service.admin_list_orders().await.unwrap();
        let listed = admin_view.iter().find(|o| o.order.id == order.id).unwrap();
        assert_eq!(listed.order.status, OrderStatus::Delivered);
        assert_eq!(
            listed.order.delivery_date,
            Some(NaiveDate::from_ymd_opt(2026, 8, 16).unwrap())
        );
        assert_eq!(listed.customer.email, "owner@example.com");

        let owner_view = service.get_order(order.id, owner).await.unwrap();
        assert_eq!(owner_view.status, OrderStatus::Delivered);
        assert_eq!(
            owner_view.delivery_date,
            Some(NaiveDate::from_ymd_opt(2026, 8, 16).unwrap())
        );
    }

    #[tokio::test]
    async fn test_admin_update_of_missing_order_is_not_found() {
        let (service, _pool) = service().await;

        assert!(matches!(
            service
                .admin_update_order(
                    4242,
                    AdminUpdateOrderRequest {
                        status: OrderStatus::Ready,
                        delivery_date: None,
                    },
                )
                .await,
            Err(AppError::NotFound(_))
        ));
    }
}
