use std::collections::BTreeMap;

use crate::catalog::{PlanPrice, SubscriptionCatalog};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    Frequency, OrderLineItem, OrderQuote, PricingItem, PricingItemResponse,
    SubscriptionPlanResponse, SubscriptionType,
};
use crate::utils::pence_to_decimal;

#[derive(Clone)]
pub struct PricingService {
    pool: DbPool,
    catalog: SubscriptionCatalog,
}

impl PricingService {
    pub fn new(pool: DbPool, catalog: SubscriptionCatalog) -> Self {
        Self { pool, catalog }
    }

    pub fn catalog(&self) -> &SubscriptionCatalog {
        &self.catalog
    }

    /// A-la-carte catalog, grouped the way the booking form renders it.
    pub async fn list_items(&self) -> AppResult<Vec<PricingItemResponse>> {
        let items = sqlx::query_as::<_, PricingItem>(
            "SELECT id, item_name, category, price_pence, description \
             FROM pricing ORDER BY category, item_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items.into_iter().map(PricingItemResponse::from).collect())
    }

    pub fn list_plans(&self) -> Vec<SubscriptionPlanResponse> {
        self.catalog.plans()
    }

    /// Exact-key plan lookup; a triple outside the grid is a validation
    /// failure, never a fallback.
    pub fn lookup_plan(
        &self,
        subscription_type: SubscriptionType,
        frequency: Frequency,
        tier: u8,
    ) -> AppResult<PlanPrice> {
        self.catalog
            .lookup(subscription_type, frequency, tier)
            .ok_or_else(|| AppError::Validation("Invalid subscription configuration".to_string()))
    }

    /// Price a selection of items. A quantity of zero unselects the item;
    /// an empty selection (before or after unselects) and unknown item ids
    /// are rejected. Line items come back ordered by item id.
    pub async fn compute_order(&self, selections: &BTreeMap<i64, u32>) -> AppResult<OrderQuote> {
        let mut line_items = Vec::new();
        let mut total_pence = 0i64;

        for (&item_id, &quantity) in selections {
            if quantity == 0 {
                continue;
            }

            let item = sqlx::query_as::<_, PricingItem>(
                "SELECT id, item_name, category, price_pence, description \
                 FROM pricing WHERE id = ?",
            )
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown pricing item: {item_id}")))?;

            let subtotal_pence = item.price_pence * i64::from(quantity);
            total_pence += subtotal_pence;
            line_items.push(OrderLineItem {
                id: item.id,
                name: item.item_name,
                quantity,
                unit_price: pence_to_decimal(item.price_pence),
                subtotal: pence_to_decimal(subtotal_pence),
            });
        }

        if line_items.is_empty() {
            return Err(AppError::Validation(
                "At least one item must be selected".to_string(),
            ));
        }

        Ok(OrderQuote {
            total: pence_to_decimal(total_pence),
            total_pence,
            line_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    async fn service() -> PricingService {
        PricingService::new(test_pool().await, SubscriptionCatalog::standard())
    }

    async fn item_id(service: &PricingService, name: &str) -> i64 {
        service
            .list_items()
            .await
            .unwrap()
            .into_iter()
            .find(|item| item.item_name == name)
            .expect("seeded item")
            .id
    }

    #[tokio::test]
    async fn test_seeded_catalog_lists_all_items() {
        let service = service().await;
        let items = service.list_items().await.unwrap();

        assert_eq!(items.len(), 15);
        let shirt = items.iter().find(|i| i.item_name == "Shirt").unwrap();
        assert_eq!(shirt.price.to_string(), "3.50");
        assert_eq!(shirt.category, "dry_clean");
    }

    #[tokio::test]
    async fn test_quote_shirts_and_trousers() {
        let service = service().await;
        let shirt = item_id(&service, "Shirt").await;
        let trousers = item_id(&service, "Trousers").await;

        let selections = BTreeMap::from([(shirt, 2), (trousers, 1)]);
        let quote = service.compute_order(&selections).await.unwrap();

        assert_eq!(quote.line_items.len(), 2);
        let shirt_line = quote.line_items.iter().find(|l| l.id == shirt).unwrap();
        assert_eq!(shirt_line.subtotal.to_string(), "7.00");
        let trousers_line = quote.line_items.iter().find(|l| l.id == trousers).unwrap();
        assert_eq!(trousers_line.subtotal.to_string(), "5.00");
        assert_eq!(quote.total.to_string(), "12.00");
        assert_eq!(quote.total_pence, 1200);
    }

    #[tokio::test]
    async fn test_quote_is_idempotent() {
        let service = service().await;
        let shirt = item_id(&service, "Shirt").await;
        let tie = item_id(&service, "Tie").await;

        let selections = BTreeMap::from([(shirt, 3), (tie, 2)]);
        let first = service.compute_order(&selections).await.unwrap();
        let second = service.compute_order(&selections).await.unwrap();

        assert_eq!(first.line_items, second.line_items);
        assert_eq!(first.total, second.total);
    }

    #[tokio::test]
    async fn test_zero_quantity_equals_omission() {
        let service = service().await;
        let shirt = item_id(&service, "Shirt").await;
        let dress = item_id(&service, "Dress").await;

        let with_zero = BTreeMap::from([(shirt, 2), (dress, 0)]);
        let without = BTreeMap::from([(shirt, 2)]);

        let a = service.compute_order(&with_zero).await.unwrap();
        let b = service.compute_order(&without).await.unwrap();
        assert_eq!(a.line_items, b.line_items);
        assert_eq!(a.total, b.total);
    }

    #[tokio::test]
    async fn test_empty_selection_rejected() {
        let service = service().await;

        let empty = BTreeMap::new();
        assert!(matches!(
            service.compute_order(&empty).await,
            Err(AppError::Validation(_))
        ));

        // All-zero collapses to empty and is rejected the same way.
        let shirt = item_id(&service, "Shirt").await;
        let all_zero = BTreeMap::from([(shirt, 0)]);
        assert!(matches!(
            service.compute_order(&all_zero).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_item_rejected() {
        let service = service().await;

        let selections = BTreeMap::from([(99_999, 1)]);
        assert!(matches!(
            service.compute_order(&selections).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_plan_lookup_errors_outside_grid() {
        let service = service().await;

        assert!(
            service
                .lookup_plan(SubscriptionType::Laundry, Frequency::Weekly, 1)
                .is_ok()
        );
        assert!(matches!(
            service.lookup_plan(SubscriptionType::Laundry, Frequency::Weekly, 5),
            Err(AppError::Validation(_))
        ));
    }
}
