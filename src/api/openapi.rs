//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, restaurant_handler, user_handler};
use crate::domain::{RestaurantResponse, UserResponse, UserRole};
use crate::services::{ProfileUpdate, TokenResponse};
use crate::types::{Direction, MessageResponse, RestaurantPage};

/// OpenAPI documentation for the Tableside API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tableside API",
        version = "0.1.0",
        description = "Restaurant ordering platform: accounts, authentication, and restaurant listings",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::verify_email,
        auth_handler::resend_verification,
        auth_handler::logout,
        // User endpoints
        user_handler::get_profile,
        user_handler::update_profile,
        user_handler::change_password,
        // Restaurant endpoints
        restaurant_handler::list_restaurants,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            RestaurantResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            auth_handler::ResendVerificationRequest,
            auth_handler::LogoutRequest,
            auth_handler::LogoutResponse,
            TokenResponse,
            // User handler types
            user_handler::ChangePasswordRequest,
            ProfileUpdate,
            // Shared types
            Direction,
            MessageResponse,
            RestaurantPage,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, and email verification"),
        (name = "Users", description = "Profile and password management"),
        (name = "Restaurants", description = "Restaurant listings")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
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
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
