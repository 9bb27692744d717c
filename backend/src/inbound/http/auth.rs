//! Login, logout and current-user endpoints.
//!
//! ```text
//! POST /api/v1/login  {"email":"ana@bank.example","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::LoginCredentials;
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{UserResponse, map_password_error};

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email; matched case-insensitively.
    #[schema(example = "ana@bank.example")]
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = ApiResponse<UserResponse>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(|err| map_password_error(err, "password"))?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_user(&user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(ApiResponse::ok("Login successful", UserResponse::from(user)))
}

/// Discard the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    ApiResponse::empty("Logged out")
}

/// Return the authenticated account.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/me")]
pub async fn me(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let user = state.users_query.get(&caller, caller.user_id()).await?;
    Ok(ApiResponse::ok("Current user", UserResponse::from(user)))
}
