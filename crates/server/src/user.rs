//! Signup and login endpoints

use api_types::user::{Credentials, UserView};
use axum::{Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};

/// Registers a new user.
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<Credentials>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let id = state
        .engine
        .register(&payload.username, &payload.password)
        .await?;
    tracing::info!(id, username = %payload.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(UserView {
            id,
            username: payload.username,
        }),
    ))
}

/// Checks credentials and returns the matching identity.
///
/// Clients then send the same credentials as HTTP Basic auth on every
/// protected request.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .authenticate(&payload.username, &payload.password)
        .await?
        .ok_or(ServerError::Unauthorized)?;

    Ok(Json(UserView {
        id: user.id,
        username: user.username,
    }))
}
