//! # HTTP Server for Paver Personalization
//!
//! Exposes the authoritative validation path to a storefront.
//!
//! ## Usage
//!
//! ```bash
//! pavers serve --listen 0.0.0.0:8080 --consent-token "$FORM_TOKEN"
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/api/rules` | List personalizable products |
//! | GET | `/api/rules/:product?cross=&graphic=` | Grid shape for the editor |
//! | POST | `/api/graphics` | Upload a graphic (multipart field `graphic`) |
//! | GET | `/api/graphics/:id` | Serve a stored graphic |
//! | POST | `/api/carts/:cart/personalize` | Validate and add a cart line |
//! | GET | `/api/carts/:cart` | Cart lines and graphic fee |
//! | DELETE | `/api/carts/:cart/lines/:index` | Remove a cart line |
//! | POST | `/api/carts/:cart/checkout` | Create an order |
//! | GET | `/api/orders/:id` | A created order |

mod handlers;
mod state;

pub use handlers::{ApiError, ErrorBody};
pub use state::{AppState, GRAPHICS_PATH, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::PaversError;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.upload_policy.max_bytes + MULTIPART_OVERHEAD;

    Router::new()
        // Rules
        .route("/api/rules", get(handlers::rules::list))
        .route("/api/rules/:product", get(handlers::rules::shape))
        // Graphics
        .route(
            GRAPHICS_PATH,
            post(handlers::graphics::upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/graphics/:id", get(handlers::graphics::fetch))
        // Carts and orders
        .route(
            "/api/carts/:cart/personalize",
            post(handlers::carts::personalize),
        )
        .route("/api/carts/:cart", get(handlers::carts::show))
        .route(
            "/api/carts/:cart/lines/:index",
            delete(handlers::carts::remove_line),
        )
        .route("/api/carts/:cart/checkout", post(handlers::carts::checkout))
        .route("/api/orders/:id", get(handlers::carts::order))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use pavers::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), pavers::error::PaversError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     consent_token: "form-token".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), PaversError> {
    if config.consent_token.is_empty() {
        return Err(PaversError::Config(
            "a consent token is required; every submission would be refused".to_string(),
        ));
    }

    let state = Arc::new(AppState::new(config.clone())?);
    info!(
        listen = %config.listen_addr,
        products = state.rules.len(),
        rules = ?config.rules_path,
        "pavers server starting"
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PaversError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PaversError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
