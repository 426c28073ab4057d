// HTTP server setup (Axum router, middleware, route handlers)
pub mod app;
pub mod extract;
pub mod middleware;
pub mod routes;

pub use app::*;
