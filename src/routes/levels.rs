//! Level list and save routes.

#[cfg(test)]
#[path = "levels_test.rs"]
mod levels_test;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use editor::doc::{Level, Levels};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::services::levels::LevelError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Error half of every level route: a status plus `{ "message": ... }`.
pub type ApiError = (StatusCode, Json<MessageResponse>);

/// Save body. Both fields are optional here so a missing one maps to 400
/// instead of the extractor's 422.
#[derive(Debug, Deserialize)]
pub struct SaveLevelBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<Level>,
}

/// `GET /api/levels`: every stored level keyed by name.
pub async fn list_levels(State(state): State<AppState>) -> Result<Json<Levels>, ApiError> {
    match state.levels.list().await {
        Ok(levels) => Ok(Json(levels)),
        Err(e) => {
            error!(error = %e, "failed to list levels");
            Err(api_error(&e, "Failed to read levels"))
        }
    }
}

/// `POST /api/save-level`: write one level to disk.
pub async fn save_level(
    State(state): State<AppState>,
    body: Result<Json<SaveLevelBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        warn!(error = %e, "rejected save-level body");
        (StatusCode::BAD_REQUEST, Json(MessageResponse::new("Invalid request body")))
    })?;

    let (Some(name), Some(data)) = (body.name, body.data) else {
        return Err((StatusCode::BAD_REQUEST, Json(MessageResponse::new("Missing name or data"))));
    };

    match state.levels.save(&name, &data).await {
        Ok(_) => Ok(Json(MessageResponse::new("Level saved successfully"))),
        Err(e) => {
            if matches!(e, LevelError::InvalidName(_)) {
                warn!(%name, "rejected level name");
            } else {
                error!(%name, error = %e, "failed to save level");
            }
            Err(api_error(&e, "Failed to save level"))
        }
    }
}

pub(crate) fn level_error_to_status(err: &LevelError) -> StatusCode {
    match err {
        LevelError::InvalidName(_) => StatusCode::BAD_REQUEST,
        LevelError::Io(_) | LevelError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: &LevelError, fallback: &str) -> ApiError {
    let status = level_error_to_status(err);
    let message = if status == StatusCode::BAD_REQUEST { err.to_string() } else { fallback.to_owned() };
    (status, Json(MessageResponse::new(message)))
}
