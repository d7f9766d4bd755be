//! HTTP request handlers.

pub mod auth_handler;
pub mod donation_handler;

pub use auth_handler::auth_routes;
pub use donation_handler::donation_routes;
