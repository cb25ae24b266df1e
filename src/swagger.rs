use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::check_postcode,
        handlers::order::list_pricing,
        handlers::order::quote,
        handlers::order::create_order,
        handlers::order::my_orders,
        handlers::order::get_order,
        handlers::order::update_status,
        handlers::subscription::list_plans,
        handlers::subscription::create_subscription,
        handlers::subscription::my_subscriptions,
        handlers::subscription::cancel_subscription,
        handlers::admin::list_orders,
        handlers::admin::list_subscriptions,
        handlers::admin::update_order,
        handlers::admin::dashboard,
        handlers::admin::customers,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UserResponse,
            AuthResponse,
            CheckPostcodeRequest,
            PostcodeCheckResponse,
            ServiceArea,
            PricingItemResponse,
            OrderLineItem,
            QuoteRequest,
            OrderQuote,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            AdminUpdateOrderRequest,
            OrderResponse,
            AdminOrderResponse,
            OrderStatus,
            SubscriptionType,
            Frequency,
            SubscriptionStatus,
            SubscriptionPlanResponse,
            CreateSubscriptionRequest,
            SubscriptionResponse,
            AdminSubscriptionResponse,
            CustomerContact,
            DashboardStats,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and postcode eligibility"),
        (name = "order", description = "A-la-carte pricing and order lifecycle"),
        (name = "subscription", description = "Subscription plans and lifecycle"),
        (name = "admin", description = "Dashboard and order management"),
    ),
    info(
        title = "Veni Vidi Laundry API",
        version = "1.0.0",
        description = "Booking platform REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
