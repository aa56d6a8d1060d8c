//! API router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ErrorResponse, PageResponse};
use super::middleware::{admin_auth_middleware, AdminAuthState};
use super::modules::{
    appointments, auth, health, menu_items,
    metrics::{http_metrics_middleware, prometheus_metrics, MetricsState},
    request_id::request_id_middleware,
    services,
};
use crate::application::{BookingService, CatalogService, IdentityService};

/// Everything the handlers need. Each module extracts its own slice via
/// `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub booking: Arc<BookingService>,
    pub catalog: Arc<CatalogService>,
    pub identity: Arc<IdentityService>,
    pub cookie_secure: bool,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for appointments::AppointmentState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            booking: Arc::clone(&s.booking),
        }
    }
}

impl FromRef<AppState> for services::CatalogState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            catalog: Arc::clone(&s.catalog),
        }
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            identity: Arc::clone(&s.identity),
            cookie_secure: s.cookie_secure,
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Router settings that are not handler state
#[derive(Clone, Default)]
pub struct RouterOptions {
    pub cors_origins: Vec<String>,
    /// Served at `/uploads`
    pub uploads_dir: PathBuf,
    /// Request body cap for admin service routes (base64 images)
    pub upload_body_limit: usize,
    /// `None` disables `/metrics`
    pub metrics: Option<PrometheusHandle>,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Admin access token from /admin/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::refresh,
        auth::logout,
        auth::forgot_password,
        auth::change_password,
        appointments::create_appointment,
        appointments::list_appointments,
        appointments::get_appointment,
        appointments::update_appointment,
        appointments::cancel_appointment,
        appointments::delete_appointment,
        services::list_services,
        services::get_service,
        services::create_service,
        services::update_service,
        services::delete_service,
        menu_items::list_menu_items,
        menu_items::get_menu_item,
        menu_items::create_menu_item,
        menu_items::update_menu_item,
        menu_items::delete_menu_item,
    ),
    components(
        schemas(
            ErrorResponse,
            PageResponse<appointments::AppointmentDto>,
            PageResponse<services::ServiceItemDto>,
            PageResponse<menu_items::MenuItemDto>,
            health::HealthResponse,
            auth::LoginRequest,
            auth::TokenResponse,
            auth::ForgotPasswordRequest,
            auth::ChangePasswordRequest,
            auth::MessageResponse,
            appointments::AppointmentDto,
            appointments::CreateAppointmentRequest,
            appointments::UpdateAppointmentRequest,
            services::ServiceItemDto,
            services::CreateServiceRequest,
            services::UpdateServiceRequest,
            menu_items::MenuItemDto,
            menu_items::CreateMenuItemRequest,
            menu_items::UpdateMenuItemRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Admin login, token refresh and password reset"),
        (name = "Appointments", description = "Public booking and admin appointment management"),
        (name = "Services", description = "Bookable services with their style variants and images"),
        (name = "Menu", description = "Public price list"),
    ),
    info(
        title = "Salon Booking API",
        version = "1.0.0",
        description = "Appointment booking and catalog administration for a beauty salon"
    )
)]
pub struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn create_api_router(state: AppState, options: RouterOptions) -> Router {
    let admin_auth = AdminAuthState {
        identity: Arc::clone(&state.identity),
    };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/appointments", post(appointments::create_appointment))
        .route("/services", get(services::list_services))
        .route("/services/{id}", get(services::get_service))
        .route("/menu-items", get(menu_items::list_menu_items))
        .route("/menu-items/{id}", get(menu_items::get_menu_item))
        .route("/admin/login", post(auth::login))
        .route("/admin/refresh", post(auth::refresh))
        .route("/admin/logout", post(auth::logout))
        .route("/admin/forgot-password", post(auth::forgot_password))
        .route("/admin/change-password", post(auth::change_password));

    let service_admin_routes = Router::new()
        .route("/admin/services", post(services::create_service))
        .route(
            "/admin/services/{id}",
            put(services::update_service).delete(services::delete_service),
        )
        .layer(DefaultBodyLimit::max(options.upload_body_limit.max(1024 * 1024)));

    let admin_routes = Router::new()
        .route("/admin/appointments", get(appointments::list_appointments))
        .route(
            "/admin/appointments/{id}",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route(
            "/admin/appointments/{id}/cancel",
            put(appointments::cancel_appointment),
        )
        .route("/admin/menu-items", post(menu_items::create_menu_item))
        .route(
            "/admin/menu-items/{id}",
            put(menu_items::update_menu_item).delete(menu_items::delete_menu_item),
        )
        .merge(service_admin_routes)
        .route_layer(middleware::from_fn_with_state(
            admin_auth,
            admin_auth_middleware,
        ));

    let mut router = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .nest_service("/uploads", ServeDir::new(&options.uploads_dir));

    if let Some(handle) = options.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&options.cors_origins))
}
