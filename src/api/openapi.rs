//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, books, dashboard, health, pages, users};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ReadEasyBank API",
        version = "0.3.0",
        description = "Student library catalog, accounts and administration REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        books::home,
        books::list_books,
        books::list_genres,
        books::get_book,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::session,
        auth::events,
        // Reader
        users::get_me,
        users::update_me,
        dashboard::get_dashboard,
        dashboard::borrow_book,
        dashboard::reserve_book,
        dashboard::return_book,
        // Admin
        admin::list_books,
        admin::create_book,
        admin::update_book,
        admin::delete_book,
        admin::list_users,
        admin::update_user_role,
        admin::get_stats,
        // Pages
        pages::about,
        pages::contact,
    ),
    components(
        schemas(
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookInput,
            crate::models::book::Availability,
            crate::models::book::SortOrder,
            crate::services::catalog::HomeSections,
            crate::services::catalog::InventoryStats,
            // Auth
            auth::LoginRequest,
            auth::RegisterRequest,
            crate::services::auth::SessionGrant,
            crate::models::session::NavState,
            crate::models::session::NavLink,
            crate::models::session::SessionEvent,
            // Users
            crate::models::profile::Role,
            crate::models::profile::UserProfile,
            crate::models::profile::UpdateProfile,
            crate::models::profile::UpdateRole,
            crate::models::profile::RoleCounts,
            // Lending
            crate::models::lending::BookRef,
            crate::models::lending::BorrowRecord,
            crate::models::lending::BorrowStatus,
            crate::models::lending::Reservation,
            crate::models::lending::ReservationStatus,
            crate::models::lending::Dashboard,
            crate::models::lending::DashboardCounts,
            // Admin
            admin::AdminStats,
            // Pages
            crate::models::contact::AboutInfo,
            crate::models::contact::ContactDetails,
            crate::models::contact::ContactMessage,
            pages::ContactAccepted,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Public catalog"),
        (name = "auth", description = "Sign-in, registration and session state"),
        (name = "users", description = "Own profile"),
        (name = "dashboard", description = "Reader dashboard and lending"),
        (name = "admin", description = "Librarian administration"),
        (name = "pages", description = "About and contact")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
