//! User management endpoints.
//!
//! ```text
//! GET    /api/v1/users               admin, paginated
//! POST   /api/v1/users               admin
//! GET    /api/v1/users/{id}          self or admin
//! PUT    /api/v1/users/{id}          self or admin; roleId admin only
//! PUT    /api/v1/users/{id}/password self only
//! DELETE /api/v1/users/{id}          admin, never self
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{NewUser, PasswordChange, UserPatch};
use crate::domain::{
    CredentialsValidationError, Email, Error, NewPassword, User, UserName, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, UserPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, page_params, parse_user_id};

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Account identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Display name.
    #[schema(example = "Ana Lopez")]
    pub name: String,
    /// Lowercased login email.
    #[schema(example = "ana@bank.example")]
    pub email: String,
    /// Role id: 1 admin, 2 advisor.
    #[schema(example = 2)]
    pub role_id: i32,
    /// Role display name.
    #[schema(example = "Advisor")]
    pub role_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            role_id: user.role.id(),
            role_name: user.role.name().to_owned(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Login email; must be unique ignoring case.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Role to assign.
    #[schema(example = 2)]
    pub role_id: i32,
}

/// Body for `PUT /api/v1/users/{id}`; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New login email.
    pub email: Option<String>,
    /// New role; admins only.
    pub role_id: Option<i32>,
}

/// Body for `PUT /api/v1/users/{id}/password`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Password in use now.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let field = err.field();
    Error::validation(err.to_string()).with_details(json!({ "field": field }))
}

/// Map a password policy failure onto `field`.
pub(crate) fn map_password_error(err: CredentialsValidationError, field: &str) -> Error {
    match err {
        CredentialsValidationError::Email(inner) => map_user_validation_error(inner),
        other => Error::validation(other.to_string()).with_details(json!({ "field": field })),
    }
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: UserName::new(&value.name).map_err(map_user_validation_error)?,
            email: Email::new(&value.email).map_err(map_user_validation_error)?,
            password: NewPassword::new(&value.password)
                .map_err(|err| map_password_error(err, "password"))?,
            role_id: value.role_id,
        })
    }
}

impl TryFrom<UpdateUserRequest> for UserPatch {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value
                .name
                .map(UserName::new)
                .transpose()
                .map_err(map_user_validation_error)?,
            email: value
                .email
                .map(Email::new)
                .transpose()
                .map_err(map_user_validation_error)?,
            role_id: value.role_id,
        })
    }
}

impl TryFrom<ChangePasswordRequest> for PasswordChange {
    type Error = Error;

    fn try_from(value: ChangePasswordRequest) -> Result<Self, Self::Error> {
        let current = Zeroizing::new(value.current_password);
        if current.is_empty() {
            return Err(Error::validation("current password must not be empty")
                .with_details(json!({ "field": "currentPassword" })));
        }
        let raw_new = Zeroizing::new(value.new_password);
        let new =
            NewPassword::new(&raw_new).map_err(|err| map_password_error(err, "newPassword"))?;
        Ok(Self { current, new })
    }
}

/// List accounts ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, clamped to the configured maximum")
    ),
    responses(
        (status = 200, description = "Users", body = ApiResponse<UserPageSchema>),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("SessionCookie" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let page = page_params(&state.page_limits, query.page, query.limit)?;
    let users = state.users_query.list(&caller, page).await?;
    Ok(ApiResponse::ok("Users retrieved", users.map(UserResponse::from)))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request or unknown role", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 409, description = "Email already registered", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security(("SessionCookie" = []))
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let new_user = NewUser::try_from(payload.into_inner())?;
    let user = state.users.create(&caller, new_user).await?;
    Ok(ApiResponse::created("User created", UserResponse::from(user)))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid id", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("SessionCookie" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let id = parse_user_id(&path, FieldName::new("id"))?;
    let user = state.users_query.get(&caller, &id).await?;
    Ok(ApiResponse::ok("User retrieved", UserResponse::from(user)))
}

/// Update name, email or role.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request or unknown role", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema),
        (status = 409, description = "Email already registered", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("SessionCookie" = []))
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let id = parse_user_id(&path, FieldName::new("id"))?;
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state.users.update(&caller, &id, patch).await?;
    Ok(ApiResponse::ok("User updated", UserResponse::from(user)))
}

/// Change the caller's own password.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/password",
    params(("id" = String, Path, description = "User identifier")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Invalid request or wrong current password", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "changePassword",
    security(("SessionCookie" = []))
)]
#[put("/users/{id}/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let id = parse_user_id(&path, FieldName::new("id"))?;
    let change = PasswordChange::try_from(payload.into_inner())?;
    state.users.change_password(&caller, &id, change).await?;
    Ok(ApiResponse::empty("Password changed"))
}

/// Delete an account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Self-deletion or account still owns sales", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 404, description = "Not found", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("SessionCookie" = []))
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller(state.login.as_ref()).await?;
    let id = parse_user_id(&path, FieldName::new("id"))?;
    state.users.delete(&caller, &id).await?;
    Ok(ApiResponse::empty("User deleted"))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
