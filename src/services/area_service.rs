use crate::database::DbPool;
use crate::error::AppResult;
use crate::models::{PostcodeCheckResponse, ServiceArea};
use crate::utils::extract_prefix;

pub const NOT_SERVICED_MESSAGE: &str = "Sorry, we do not currently service your area.";
pub const COVERAGE_MESSAGE: &str = "Sorry, we do not currently service your area. \
     We cover SW London, Central London, Heathrow, Staines, and Weybridge.";

#[derive(Clone)]
pub struct AreaService {
    pool: DbPool,
}

impl AreaService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Resolve a raw postcode to an active service area, if any. The stored
    /// prefixes are unique, so at most one rule can match.
    pub async fn find_active_area(&self, postcode: &str) -> AppResult<Option<ServiceArea>> {
        let prefix = extract_prefix(postcode);
        if prefix.is_empty() {
            return Ok(None);
        }

        let area = sqlx::query_as::<_, ServiceArea>(
            "SELECT id, postcode_prefix, area_name, active \
             FROM service_areas WHERE postcode_prefix = ? AND active = 1",
        )
        .bind(&prefix)
        .fetch_optional(&self.pool)
        .await?;

        Ok(area)
    }

    /// Never fails on bad input; an unmatchable postcode is just ineligible.
    pub async fn check_postcode(&self, postcode: &str) -> AppResult<PostcodeCheckResponse> {
        match self.find_active_area(postcode).await? {
            Some(area) => Ok(PostcodeCheckResponse {
                in_service_area: true,
                area_name: Some(area.area_name),
                message: None,
            }),
            None => Ok(PostcodeCheckResponse {
                in_service_area: false,
                area_name: None,
                message: Some(NOT_SERVICED_MESSAGE.to_string()),
            }),
        }
    }
}
