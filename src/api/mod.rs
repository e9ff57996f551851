//! HTTP API module: JSON user-management endpoints under `/api`.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use middleware::{with_middleware, ClientIp};
pub use routes::{api_routes, create_router};
