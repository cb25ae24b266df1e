use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::utils::pence_to_decimal;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PricingItem {
    pub id: i64,
    pub item_name: String,
    pub category: String,
    pub price_pence: i64,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PricingItemResponse {
    pub id: i64,
    pub item_name: String,
    pub category: String,
    #[schema(value_type = String, example = "3.50")]
    pub price: Decimal,
    pub description: Option<String>,
}

impl From<PricingItem> for PricingItemResponse {
    fn from(item: PricingItem) -> Self {
        Self {
            id: item.id,
            item_name: item.item_name,
            category: item.category,
            price: pence_to_decimal(item.price_pence),
            description: item.description,
        }
    }
}

/// One priced line of an a-la-carte order. This is the exact shape encoded
/// into the orders.items column and decoded back out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLineItem {
    pub id: i64,
    pub name: String,
    pub quantity: u32,
    #[schema(value_type = String, example = "3.50")]
    pub unit_price: Decimal,
    #[schema(value_type = String, example = "7.00")]
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequest {
    /// Item id mapped to requested quantity; zero quantities are ignored.
    #[schema(value_type = Object)]
    pub selections: BTreeMap<i64, u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderQuote {
    pub line_items: Vec<OrderLineItem>,
    #[schema(value_type = String, example = "12.00")]
    pub total: Decimal,
    #[serde(skip)]
    pub total_pence: i64,
}
