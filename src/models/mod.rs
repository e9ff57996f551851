//! Data model for the API.
//!
//! This module holds:
//! - User records and the create-user request
//! - The response envelope wrapping every API result
//! - The health check payload

pub mod response;
pub mod user;

pub use response::{ApiResponse, HealthInfo, API_VERSION};
pub use user::{CreateUserRequest, NewUser, User, UserId};
