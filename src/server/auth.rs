use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::auth::{RequireUser, hash_password, issue_session, verify_password};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{
    ChangePasswordRequest, LoginRequest, OkResponse, RegisterRequest, SessionResponse,
    UpdateProfileRequest, UserResponse,
};
use crate::server::folders::ensure_system_folders;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation::validate_login;
use crate::types::NewUser;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let first_name = req.first_name.as_deref().map(str::trim).unwrap_or_default();
    let last_name = req.last_name.as_deref().map(str::trim).unwrap_or_default();
    let login = req.login.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    if first_name.is_empty() || last_name.is_empty() || password.trim().is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let login = validate_login(login)?;

    let password_hash =
        hash_password(password).map_err(|_| ApiError::internal("Failed to hash password"))?;

    let user = match store.create_user(&NewUser {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        login,
        password_hash,
    }) {
        Ok(user) => user,
        Err(Error::Conflict(_)) => return Err(ApiError::conflict("Login already taken")),
        Err(e) => {
            tracing::error!("Failed to create user: {e}");
            return Err(ApiError::internal("Failed to create user"));
        }
    };

    ensure_system_folders(store, user.id).api_err("Failed to create default folders")?;

    let token =
        issue_session(store, user.id).map_err(|_| ApiError::internal("Failed to create session"))?;

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user: UserResponse::from(&user),
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let login = req.login.as_deref().map(str::trim).unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    // One message for unknown login and wrong password alike.
    let invalid = || ApiError::unauthorized("Invalid login or password");

    let user = store
        .get_user_by_login(login)
        .api_err("Failed to look up user")?
        .ok_or_else(invalid)?;

    if !verify_password(password, &user.password_hash)
        .map_err(|_| ApiError::internal("Failed to verify password"))?
    {
        return Err(invalid());
    }

    let token =
        issue_session(store, user.id).map_err(|_| ApiError::internal("Failed to create session"))?;

    Ok::<_, ApiError>(Json(SessionResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

pub async fn logout(auth: RequireUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state
        .store
        .delete_session(&auth.session.id)
        .api_err("Failed to delete session")?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn me(auth: RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from(&auth.user))
}

pub async fn update_profile(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    let first_name = req.first_name.as_deref().map(str::trim).unwrap_or_default();
    let last_name = req.last_name.as_deref().map(str::trim).unwrap_or_default();

    if first_name.is_empty() || last_name.is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }

    state
        .store
        .update_user_profile(auth.user.id, first_name, last_name)
        .api_err("Failed to update profile")?;

    Ok::<_, ApiError>(Json(OkResponse::new()))
}

pub async fn change_password(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChangePasswordRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let current = req.current_password.as_deref().unwrap_or_default();
    let new = req.new_password.as_deref().unwrap_or_default();

    if current.trim().is_empty() || new.trim().is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }

    if !verify_password(current, &auth.user.password_hash)
        .map_err(|_| ApiError::internal("Failed to verify password"))?
    {
        return Err(ApiError::forbidden("Current password is incorrect"));
    }

    let password_hash =
        hash_password(new).map_err(|_| ApiError::internal("Failed to hash password"))?;

    store
        .update_user_password(auth.user.id, &password_hash)
        .api_err("Failed to update password")?;

    // A changed password invalidates every other device.
    store
        .delete_user_sessions_except(auth.user.id, &auth.session.id)
        .api_err("Failed to revoke sessions")?;

    Ok::<_, ApiError>(Json(OkResponse::new()))
}
