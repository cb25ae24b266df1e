use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ServiceArea {
    pub id: i64,
    pub postcode_prefix: String,
    pub area_name: String,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckPostcodeRequest {
    #[schema(example = "SW1A 1AA")]
    pub postcode: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostcodeCheckResponse {
    pub in_service_area: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
