//! User endpoints: sign-up, profile, role and membership

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{NewUser, User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, AuthUser, ValidEmail, ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;
use crate::models::{search_term, Badge, Email, Role};

/// Sign-up request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default, rename = "photoURL", alias = "photoUrl")]
    pub photo_url: Option<String>,
}

/// User response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub user_name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub badge: Badge,
    pub role: Role,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            user_name: u.user_name,
            photo_url: u.photo_url,
            badge: u.badge,
            role: u.role,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct RoleResponse {
    pub role: Role,
}

#[derive(Deserialize)]
pub struct UserSearchParams {
    pub search: Option<String>,
}

/// POST /users - register if absent (201), else return the existing user (200)
async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let email = Email::new(&req.email)?;
    let (user, created) = UserRepo::new(&state.pool)
        .register(NewUser {
            email,
            user_name: req.user_name.trim().to_owned(),
            photo_url: req.photo_url,
        })
        .await?;

    let status = if created {
        tracing::info!(user_id = %user.id, email = %user.email, "user registered");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(UserResponse::from(user))))
}

/// GET /users?search= - all users, optionally filtered by name (admin)
async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ValidQuery(params): ValidQuery<UserSearchParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&state.pool)
        .list(search_term(params.search.as_deref()))
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /myProfile/{email}
async fn get_profile(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ValidEmail(email): ValidEmail,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool).get_by_email(email.as_str()).await?;
    Ok(Json(UserResponse::from(user)))
}

/// GET /role/{email}
async fn get_role(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ValidEmail(email): ValidEmail,
) -> Result<Json<RoleResponse>, ApiError> {
    let user = UserRepo::new(&state.pool).get_by_email(email.as_str()).await?;
    Ok(Json(RoleResponse { role: user.role }))
}

/// PATCH /makeAdmin/{id} (admin)
async fn make_admin(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidUuid(id): ValidUuid,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool).make_admin(id).await?;
    tracing::info!(user_id = %id, granted_by = %admin.email, "admin role granted");
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /badge/{email} - gold membership after payment
async fn upgrade_badge(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ValidEmail(email): ValidEmail,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool)
        .set_badge(email.as_str(), Badge::Gold)
        .await?;
    tracing::info!(email = %user.email, "badge upgraded to gold");
    Ok(Json(UserResponse::from(user)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/myProfile/{email}", get(get_profile))
        .route("/role/{email}", get(get_role))
        .route("/makeAdmin/{id}", patch(make_admin))
        .route("/badge/{email}", patch(upgrade_badge))
}
