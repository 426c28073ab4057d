//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use twilio::{TwilioOptions, TwilioService};

use crate::config::Config;
use crate::domains::auth::{JwtService, OtpStore};
use crate::domains::uploads::{UploadStore, MIB};
use crate::kernel::{GoogleTokenInfoClient, ServerDeps, TwilioAdapter};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{auth, contacts, health_handler, numbers, sell_enquiries};

/// Upper bound for a whole request body. Per-file limits are enforced by the upload rules.
pub const MAX_BODY_BYTES: usize = 100 * MIB;

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

/// Wire the production collaborators: Twilio for SMS, Google tokeninfo for ID tokens.
pub fn build_server_deps(pool: PgPool, config: &Config) -> Result<ServerDeps> {
    let twilio = Arc::new(TwilioService::new(TwilioOptions {
        account_sid: config.twilio_account_sid.clone(),
        auth_token: config.twilio_auth_token.clone(),
        from_number: config.twilio_phone_number.clone(),
    }));

    let uploads = UploadStore::new(config.upload_dir.clone())?;

    Ok(ServerDeps::new(
        pool,
        Arc::new(TwilioAdapter::new(twilio)),
        Arc::new(GoogleTokenInfoClient::new()),
        OtpStore::new(),
        Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone())),
        uploads,
        config.google_client_id.clone(),
    ))
}

/// Build the Axum application router
pub fn build_app(server_deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let jwt_service = server_deps.jwt_service.clone();
    let upload_dir = server_deps.uploads.dir().to_path_buf();

    let app_state = AxumAppState {
        db_pool: server_deps.db_pool.clone(),
        server_deps: Arc::new(server_deps),
        jwt_service: jwt_service.clone(),
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .nest("/api/auth", auth::routes())
        .nest("/api/contact", contacts::routes())
        .nest("/api/numbers", numbers::routes())
        .nest("/api/sell-enquiries", sell_enquiries::routes())
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
