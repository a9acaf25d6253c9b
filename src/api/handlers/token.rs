use crate::{
    types::{AppError, ErrorResponse, Result, TokenRequest, TokenResponse},
    AppState,
};
use axum::{extract::State, Json};

/// Exchange a username and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    // Validate input
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "username and password are required".to_string(),
        ));
    }

    let authorities = state
        .credentials
        .verify_credentials(&payload.username, &payload.password)
        .await
        .inspect_err(|e| {
            tracing::warn!(username = %payload.username, "Token request refused: {}", e)
        })?;

    let token = state.verifier.issue(&payload.username, &authorities)?;
    tracing::info!(
        subject = %payload.username,
        expires_at = token.expires_at,
        "Token issued"
    );

    Ok(Json(TokenResponse {
        expires_in: token.ttl(),
        expires_at: token.expires_at,
        token_type: "Bearer".to_string(),
        token: token.value,
    }))
}
