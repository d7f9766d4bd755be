//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, donation_handler};
use crate::domain::{
    Donation, DonationStatus, DonorSummary, FoodItem, NearbyDonation, Point, UserResponse, UserRole,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the Mealbridge API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mealbridge API",
        version = "0.1.0",
        description = "Food-donation coordination: donors post surplus food, volunteers claim nearby pickups",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Donation endpoints
        donation_handler::create_donation,
        donation_handler::my_donations,
        donation_handler::my_pickups,
        donation_handler::nearby_donations,
        donation_handler::get_donation,
        donation_handler::update_donation,
        donation_handler::accept_donation,
        donation_handler::reject_donation,
        donation_handler::complete_donation,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            DonorSummary,
            Donation,
            DonationStatus,
            FoodItem,
            Point,
            NearbyDonation,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // Donation handler types
            donation_handler::DonationRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Donations", description = "Donation lifecycle and nearby search")
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
