pub mod admin;
pub mod auth;
pub mod order;
pub mod subscription;

pub use admin::admin_config;
pub use auth::auth_config;
pub use order::order_config;
pub use subscription::subscription_config;

use actix_web::HttpResponse;
use serde_json::json;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "Veni Vidi Laundry API is running"
    }))
}
