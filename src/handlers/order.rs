use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::{OrderService, PricingService};

#[utoipa::path(
    get,
    path = "/orders/pricing",
    tag = "order",
    responses(
        (status = 200, description = "A-la-carte item catalog", body = [PricingItemResponse])
    )
)]
pub async fn list_pricing(pricing_service: web::Data<PricingService>) -> Result<HttpResponse> {
    match pricing_service.list_items().await {
        Ok(items) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": items
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/quote",
    tag = "order",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Priced line items and total", body = OrderQuote),
        (status = 400, description = "Empty selection or unknown item")
    )
)]
pub async fn quote(
    pricing_service: web::Data<PricingService>,
    request: web::Json<QuoteRequest>,
) -> Result<HttpResponse> {
    match pricing_service.compute_order(&request.selections).await {
        Ok(quote) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": quote
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/create",
    tag = "order",
    request_body = CreateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service.create_order(user.id, request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/my-orders",
    tag = "order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's orders, newest first", body = [OrderResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_orders(
    order_service: web::Data<OrderService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match order_service.my_orders(user.id).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": orders
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order detail", body = OrderResponse),
        (status = 404, description = "Order missing or owned by someone else")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match order_service.get_order(path.into_inner(), user.id).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Order missing or owned by someone else")
    )
)]
pub async fn update_status(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    path: web::Path<i64>,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update_status(path.into_inner(), user.id, request.status)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order status updated successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("/pricing", web::get().to(list_pricing))
            .route("/quote", web::post().to(quote))
            .route("/create", web::post().to(create_order))
            .route("/my-orders", web::get().to(my_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}/status", web::put().to(update_status)),
    );
}
