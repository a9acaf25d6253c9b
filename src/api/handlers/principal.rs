use crate::{
    auth::authz::require_authority,
    gate::AuthUser,
    types::{ErrorResponse, PrincipalResponse, Result, StatusResponse},
};
use axum::Json;

/// Authority required by the admin endpoints.
pub const ADMIN_AUTHORITY: &str = "ROLE_ADMIN";

/// Describe the caller
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Authenticated principal", body = PrincipalResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "principal"
)]
pub async fn me(AuthUser(principal): AuthUser) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(&principal))
}

/// Admin-only liveness check
#[utoipa::path(
    get,
    path = "/api/admin/ping",
    responses(
        (status = 200, description = "Caller holds ROLE_ADMIN", body = StatusResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller lacks ROLE_ADMIN", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "principal"
)]
pub async fn admin_ping(AuthUser(principal): AuthUser) -> Result<Json<StatusResponse>> {
    require_authority(&principal, ADMIN_AUTHORITY)?;

    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;
    use tollgate_token::Principal;

    #[tokio::test]
    async fn test_me_echoes_principal() {
        let principal = Principal::new("alice", vec!["ROLE_USER".into()]);
        let Json(body) = me(AuthUser(principal)).await;

        assert_eq!(body.subject, "alice");
        assert_eq!(body.authorities, vec!["ROLE_USER"]);
    }

    #[tokio::test]
    async fn test_admin_ping_requires_admin() {
        let user = Principal::new("alice", vec!["ROLE_USER".into()]);
        assert!(matches!(
            admin_ping(AuthUser(user)).await,
            Err(AppError::Forbidden(_))
        ));

        let admin = Principal::new("root", vec![ADMIN_AUTHORITY.into()]);
        let Json(body) = admin_ping(AuthUser(admin)).await.unwrap();
        assert_eq!(body.status, "ok");
    }
}
