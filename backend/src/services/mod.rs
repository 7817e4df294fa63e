//! Business logic services for the Paddy Yield Advisory Platform

pub mod auth;
pub mod prediction;

pub use auth::AuthService;
pub use prediction::PredictionService;
