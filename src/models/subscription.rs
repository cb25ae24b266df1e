use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::CustomerContact;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SubscriptionType {
    Laundry,
    ShirtsTrousers,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Fortnightly,
}

/// Active until cancelled; cancellation is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRecord {
    pub id: i64,
    pub user_id: i64,
    pub subscription_type: SubscriptionType,
    pub tier: i64,
    pub frequency: Frequency,
    pub status: SubscriptionStatus,
    pub next_pickup_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub subscription_type: SubscriptionType,
    #[schema(example = 1)]
    pub tier: u8,
    pub frequency: Frequency,
    #[schema(example = "2026-08-14")]
    pub pickup_date: String,
}

/// Stored row enriched with the price and description currently in the plan
/// catalog; the price is resolved live, not snapshotted at creation time.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub subscription_type: SubscriptionType,
    pub tier: i64,
    pub frequency: Frequency,
    pub status: SubscriptionStatus,
    pub next_pickup_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    #[schema(value_type = String, example = "15.99")]
    pub price: Decimal,
    pub description: String,
}

#[derive(Debug, FromRow)]
pub struct AdminSubscriptionRow {
    #[sqlx(flatten)]
    pub subscription: SubscriptionRecord,
    #[sqlx(flatten)]
    pub customer: CustomerContact,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminSubscriptionResponse {
    #[serde(flatten)]
    pub subscription: SubscriptionResponse,
    pub customer: CustomerContact,
}

/// One entry of the plan grid as listed by the pricing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionPlanResponse {
    pub subscription_type: SubscriptionType,
    pub frequency: Frequency,
    pub tier: u8,
    #[schema(value_type = String, example = "15.99")]
    pub price: Decimal,
    pub description: String,
}
