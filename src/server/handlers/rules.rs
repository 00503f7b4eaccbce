//! Rule lookup handlers.
//!
//! The interactive surface asks for a product's grid shape here before
//! rendering the editor, and again whenever the cross or graphic toggles
//! change.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::charset;
use crate::config::Notices;
use crate::rules::{GridRule, SessionFlags};

use super::super::state::AppState;
use super::ApiError;

#[derive(Debug, Serialize)]
pub struct RuleSummary {
    pub product: String,
    #[serde(flatten)]
    pub rule: GridRule,
}

/// Grid shape for one product under the given toggles.
#[derive(Debug, Serialize)]
pub struct GridShape {
    pub product: String,
    #[serde(flatten)]
    pub rule: GridRule,
    pub flags: SessionFlags,
    pub effective_columns: usize,
    pub allowed_pattern: &'static str,
    pub notices: Notices,
}

/// Query parameters for the rule endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ShapeQuery {
    #[serde(default)]
    pub cross: bool,
    #[serde(default)]
    pub graphic: bool,
}

/// GET /api/rules - list every personalizable product.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<RuleSummary>> {
    Json(
        state
            .rules
            .iter()
            .map(|(product, rule)| RuleSummary {
                product: product.to_string(),
                rule: *rule,
            })
            .collect(),
    )
}

/// GET /api/rules/:product - grid shape, or 404 when not personalizable.
pub async fn shape(
    State(state): State<Arc<AppState>>,
    Path(product): Path<String>,
    Query(query): Query<ShapeQuery>,
) -> Result<Json<GridShape>, ApiError> {
    let rule = state
        .rules
        .resolve(&product)
        .ok_or_else(|| ApiError::not_found(format!("{product} is not personalizable")))?;

    let flags = rule.sanitize_flags(SessionFlags {
        cross_selected: query.cross,
        graphic_attached: query.graphic,
    });

    Ok(Json(GridShape {
        product,
        rule: *rule,
        flags,
        effective_columns: rule.effective_columns(flags),
        allowed_pattern: charset::PATTERN,
        notices: state.config.notices.clone(),
    }))
}
