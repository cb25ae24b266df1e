use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::AppError;
use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::{AdminService, OrderService, SubscriptionService};

#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All orders with owner contact data", body = [AdminOrderResponse]),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    if !user.is_admin {
        return Ok(AppError::Forbidden.error_response());
    }

    match order_service.admin_list_orders().await {
        Ok(orders) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": orders
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/subscriptions",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All subscriptions with owner contact data",
         body = [AdminSubscriptionResponse]),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    if !user.is_admin {
        return Ok(AppError::Forbidden.error_response());
    }

    match subscription_service.admin_list_subscriptions().await {
        Ok(subscriptions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": subscriptions
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/orders/{id}/status",
    tag = "admin",
    params(("id" = i64, Path, description = "Order id")),
    request_body = AdminUpdateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order updated"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order(
    order_service: web::Data<OrderService>,
    user: AuthUser,
    path: web::Path<i64>,
    request: web::Json<AdminUpdateOrderRequest>,
) -> Result<HttpResponse> {
    if !user.is_admin {
        return Ok(AppError::Forbidden.error_response());
    }

    match order_service
        .admin_update_order(path.into_inner(), request.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Order updated successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardStats),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn dashboard(
    admin_service: web::Data<AdminService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    if !user.is_admin {
        return Ok(AppError::Forbidden.error_response());
    }

    match admin_service.dashboard().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/customers",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customer roster, newest first", body = [UserResponse]),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn customers(
    admin_service: web::Data<AdminService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    if !user.is_admin {
        return Ok(AppError::Forbidden.error_response());
    }

    match admin_service.customers().await {
        Ok(customers) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": customers
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/orders", web::get().to(list_orders))
            .route("/subscriptions", web::get().to(list_subscriptions))
            .route("/orders/{id}/status", web::put().to(update_order))
            .route("/dashboard", web::get().to(dashboard))
            .route("/customers", web::get().to(customers)),
    );
}
