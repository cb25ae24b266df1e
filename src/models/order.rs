use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::models::{CustomerContact, OrderLineItem};
use crate::utils::pence_to_decimal;

/// Six-value status vocabulary. Admins may move an order between any two of
/// these; there is deliberately no forward-only ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    PickedUp,
    Processing,
    Ready,
    Delivered,
    Cancelled,
}

/// Order row as persisted; line items are JSON text until decoded at the
/// store boundary by `into_response`.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub user_id: i64,
    pub order_type: String,
    pub items: String,
    pub total_price_pence: i64,
    pub pickup_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub subscription_id: Option<i64>,
    pub special_instructions: Option<String>,
    pub created_at: NaiveDateTime,
}

impl OrderRecord {
    pub fn into_response(self) -> AppResult<OrderResponse> {
        let items: Vec<OrderLineItem> = serde_json::from_str(&self.items)?;
        Ok(OrderResponse {
            id: self.id,
            order_type: self.order_type,
            items,
            total_price: pence_to_decimal(self.total_price_pence),
            pickup_date: self.pickup_date,
            delivery_date: self.delivery_date,
            status: self.status,
            subscription_id: self.subscription_id,
            special_instructions: self.special_instructions,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[schema(example = "dry_cleaning")]
    pub order_type: String,
    /// Item id mapped to requested quantity; zero quantities are ignored.
    #[schema(value_type = Object)]
    pub selections: BTreeMap<i64, u32>,
    #[schema(example = "2026-08-14")]
    pub pickup_date: String,
    pub special_instructions: Option<String>,
    pub subscription_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUpdateOrderRequest {
    pub status: OrderStatus,
    #[schema(example = "2026-08-16")]
    pub delivery_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_type: String,
    pub items: Vec<OrderLineItem>,
    #[schema(value_type = String, example = "12.00")]
    pub total_price: Decimal,
    pub pickup_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub subscription_id: Option<i64>,
    pub special_instructions: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, FromRow)]
pub struct AdminOrderRow {
    #[sqlx(flatten)]
    pub order: OrderRecord,
    #[sqlx(flatten)]
    pub customer: CustomerContact,
}

impl AdminOrderRow {
    pub fn into_response(self) -> AppResult<AdminOrderResponse> {
        Ok(AdminOrderResponse {
            order: self.order.into_response()?,
            customer: self.customer,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub customer: CustomerContact,
}
