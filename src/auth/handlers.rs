use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{required, AuthResponse, LoginRequest, RegisterRequest},
        extractors::AuthUser,
        password::{hash_password, verify_password},
        services::{is_valid_email, normalize_email, JwtKeys},
    },
    error::{AppError, AppResult},
    state::AppState,
    users::repo_types::{NewUser, PublicUser, UserStatus},
};

const BAD_CREDENTIALS: &str = "Invalid email or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Password is checked for presence only; it is hashed as sent.
fn required_password(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|p| !p.trim().is_empty())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let Json(payload) = payload?;
    let (Some(name), Some(email), Some(password)) = (
        required(&payload.name),
        required(&payload.email),
        required_password(&payload.password),
    ) else {
        warn!("register with missing fields");
        return Err(AppError::validation("Name, email and password are required"));
    };

    let email = normalize_email(email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }

    // Ensure email is not taken
    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::conflict("Email already exists"));
    }

    let password_hash = hash_password(password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::from(e)
    })?;

    let user = state
        .users
        .create(NewUser {
            name: name.to_string(),
            email,
            password_hash,
            status: UserStatus::Active,
        })
        .await?;

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".into(),
            token,
            user: PublicUser::from(user),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let (Some(email), Some(password)) = (
        required(&payload.email),
        required_password(&payload.password),
    ) else {
        return Err(AppError::validation("Email and password are required"));
    };
    let email = normalize_email(email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.into()));
    };

    let ok = verify_password(password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        AppError::from(e)
    })?;

    if !ok {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthenticated(BAD_CREDENTIALS.into()));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: PublicUser::from(user),
    }))
}

#[instrument(skip(state, caller), fields(caller = caller.id, email = %caller.email))]
pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = state
        .users
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user.into()))
}
