//! Cart and checkout handlers.
//!
//! Personalization requests always go through [`Submission::process`]; a
//! refused request leaves the cart exactly as it was.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::error::Rejection;
use crate::order::Order;
use crate::record::GraphicRef;
use crate::rules::Money;
use crate::submission::{Outcome, Submission, UploadOutcome};

use super::super::state::AppState;
use super::ApiError;

fn default_quantity() -> u32 {
    1
}

/// Request body for the personalize endpoint.
#[derive(Debug, Deserialize)]
pub struct PersonalizeRequest {
    #[serde(flatten)]
    pub submission: Submission,
    /// Id returned by `POST /api/graphics`
    #[serde(default)]
    pub graphic_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Cart contents with the freshly computed graphic fee.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub cart: String,
    pub lines: Vec<CartLine>,
    pub graphic_fee: Money,
}

#[derive(Debug, Serialize)]
pub struct PersonalizeResponse {
    pub success: bool,
    pub personalized: bool,
    pub line: usize,
    #[serde(flatten)]
    pub view: CartView,
}

fn view(state: &AppState, id: &str, cart: &Cart) -> CartView {
    CartView {
        cart: id.to_string(),
        lines: cart.lines().to_vec(),
        graphic_fee: cart.graphic_fee(&state.rules),
    }
}

/// POST /api/carts/:cart/personalize - validate and add a cart line.
pub async fn personalize(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<String>,
    Json(request): Json<PersonalizeRequest>,
) -> Result<Json<PersonalizeResponse>, ApiError> {
    if request.quantity == 0 {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Quantity must be at least 1",
        ));
    }

    let mut submission = request.submission;
    if let Some(id) = request.graphic_id.filter(|id| !id.is_empty()) {
        submission.upload = if state.graphics.contains(&id).await {
            UploadOutcome::Stored(GraphicRef {
                url: format!("{}/{}", state.graphics_url, id),
                id,
            })
        } else {
            UploadOutcome::Failed(Rejection::UploadFailed(
                "the graphic was not found, upload it again".to_string(),
            ))
        };
    }

    let product = submission.product.clone();
    let line = match submission.process(&state.rules, &state.consent)? {
        Outcome::Accepted(record) => CartLine::personalized(record, request.quantity),
        Outcome::NotPersonalizable => CartLine::new(product, request.quantity),
    };
    let personalized = line.personalization.is_some();

    let mut carts = state.carts.write().await;
    let cart = carts.entry(cart_id.clone()).or_default();
    let index = cart.add(line);
    info!(cart = %cart_id, line = index, personalized, "cart line added");

    Ok(Json(PersonalizeResponse {
        success: true,
        personalized,
        line: index,
        view: view(&state, &cart_id, cart),
    }))
}

/// GET /api/carts/:cart - lines and current graphic fee.
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let carts = state.carts.read().await;
    let cart = carts
        .get(&cart_id)
        .ok_or_else(|| ApiError::not_found("Cart not found"))?;
    Ok(Json(view(&state, &cart_id, cart)))
}

/// DELETE /api/carts/:cart/lines/:index - drop one line.
pub async fn remove_line(
    State(state): State<Arc<AppState>>,
    Path((cart_id, index)): Path<(String, usize)>,
) -> Result<Json<CartView>, ApiError> {
    let mut carts = state.carts.write().await;
    let cart = carts
        .get_mut(&cart_id)
        .ok_or_else(|| ApiError::not_found("Cart not found"))?;
    cart.remove(index)
        .ok_or_else(|| ApiError::not_found("Cart line not found"))?;
    Ok(Json(view(&state, &cart_id, cart)))
}

/// POST /api/carts/:cart/checkout - turn the cart into an order.
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Path(cart_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let lines = {
        let mut carts = state.carts.write().await;
        let cart = carts
            .get_mut(&cart_id)
            .filter(|cart| !cart.is_empty())
            .ok_or_else(|| ApiError::not_found("Cart is empty"))?;
        cart.take()
    };

    let order = Order::from_cart(Uuid::new_v4().to_string(), &lines, &state.rules);
    info!(
        cart = %cart_id,
        order = %order.id,
        lines = order.lines.len(),
        graphic_fee = %order.graphic_fee,
        "order created"
    );
    state
        .orders
        .write()
        .await
        .insert(order.id.clone(), order.clone());
    Ok(Json(order))
}

/// GET /api/orders/:id - a stored order.
pub async fn order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    state
        .orders
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Order not found"))
}
