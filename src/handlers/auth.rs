use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::{AreaService, AuthService};

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed or postcode outside coverage"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match auth_service.register(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/check-postcode",
    tag = "auth",
    request_body = CheckPostcodeRequest,
    responses(
        (status = 200, description = "Eligibility result", body = PostcodeCheckResponse),
        (status = 400, description = "Postcode missing")
    )
)]
pub async fn check_postcode(
    area_service: web::Data<AreaService>,
    request: web::Json<CheckPostcodeRequest>,
) -> Result<HttpResponse> {
    // Only a missing value is a validation failure; anything else, including
    // whitespace, goes through the matcher and comes back ineligible.
    if request.postcode.is_empty() {
        return Ok(
            crate::error::AppError::Validation("Postcode required".to_string()).error_response(),
        );
    }

    match area_service.check_postcode(&request.postcode).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/check-postcode", web::post().to(check_postcode)),
    );
}
