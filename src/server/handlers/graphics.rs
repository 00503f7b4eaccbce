//! Graphic upload handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Rejection;
use crate::record::GraphicRef;
use crate::upload::StoredGraphic;

use super::super::state::AppState;
use super::ApiError;

/// Multipart field carrying the file.
pub const FIELD: &str = "graphic";

fn multipart_rejection(state: &AppState, e: MultipartError) -> Rejection {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Rejection::UploadTooLarge {
            max_bytes: state.upload_policy.max_bytes,
        }
    } else {
        Rejection::UploadFailed(e.body_text())
    }
}

/// POST /api/graphics - Upload a graphic file.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<GraphicRef>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_rejection(&state, e))?
    {
        if field.name() != Some(FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("unknown").to_string();
        let declared = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_rejection(&state, e))?;

        let content_type = state
            .upload_policy
            .check(&filename, declared.as_deref(), bytes.len())
            .inspect_err(|rejection| warn!(%filename, "graphic refused: {rejection}"))?;

        let reference = state
            .graphics
            .store(StoredGraphic {
                filename: filename.clone(),
                content_type,
                bytes: bytes.to_vec(),
            })
            .await
            .map_err(|e| Rejection::UploadFailed(e.to_string()))?;

        info!(%filename, id = %reference.id, size = bytes.len(), "graphic stored");
        return Ok(Json(reference));
    }

    Err(Rejection::UploadFailed(format!("no '{FIELD}' field in the upload")).into())
}

/// GET /api/graphics/:id - Serve a stored graphic.
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let graphic = state
        .graphics
        .fetch(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Graphic not found"))?;

    Ok(([(header::CONTENT_TYPE, graphic.content_type)], graphic.bytes))
}
