//! HTTP request handlers

pub mod auth;
pub mod health;
pub mod predict;

pub use auth::*;
pub use health::*;
pub use predict::*;
