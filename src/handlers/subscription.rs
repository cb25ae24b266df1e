use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::{PricingService, SubscriptionService};

#[utoipa::path(
    get,
    path = "/subscriptions/pricing",
    tag = "subscription",
    responses(
        (status = 200, description = "Plan grid", body = [SubscriptionPlanResponse])
    )
)]
pub async fn list_plans(pricing_service: web::Data<PricingService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": pricing_service.list_plans()
    })))
}

#[utoipa::path(
    post,
    path = "/subscriptions/create",
    tag = "subscription",
    request_body = CreateSubscriptionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid subscription configuration"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_subscription(
    subscription_service: web::Data<SubscriptionService>,
    user: AuthUser,
    request: web::Json<CreateSubscriptionRequest>,
) -> Result<HttpResponse> {
    match subscription_service
        .create_subscription(user.id, request.into_inner())
        .await
    {
        Ok(subscription) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": subscription,
            "message": "Subscription created successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/my-subscriptions",
    tag = "subscription",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's subscriptions, newest first, with live pricing",
         body = [SubscriptionResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match subscription_service.my_subscriptions(user.id).await {
        Ok(subscriptions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": subscriptions
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/subscriptions/{id}/cancel",
    tag = "subscription",
    params(("id" = i64, Path, description = "Subscription id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscription cancelled"),
        (status = 404, description = "Subscription missing or owned by someone else")
    )
)]
pub async fn cancel_subscription(
    subscription_service: web::Data<SubscriptionService>,
    user: AuthUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match subscription_service.cancel(path.into_inner(), user.id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Subscription cancelled successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .route("/pricing", web::get().to(list_plans))
            .route("/create", web::post().to(create_subscription))
            .route("/my-subscriptions", web::get().to(my_subscriptions))
            .route("/{id}/cancel", web::put().to(cancel_subscription)),
    );
}
