//! Authentication handlers: register, login, me.

use actix_web::{HttpResponse, web};

use quill_core::domain::{User, validate_registration};
use quill_core::ports::{AuthError, PasswordService, TokenService, UserRepository};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_view(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        username: user.username.clone(),
        created_at: user.created_at,
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_registration(&req.email, &req.username, &req.password)?;

    // Either column colliding is a conflict; the message does not say which.
    if state
        .users
        .find_by_email_or_username(&req.email, &req.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "This email or username is already taken".to_string(),
        ));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state
        .users
        .insert(User::new(req.email, req.username, password_hash))
        .await?;

    let token = state.tokens.generate_token(user.id)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        user: user_view(&user),
        token,
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    // Unknown email and wrong password take the same exit so the response
    // cannot be used to enumerate accounts.
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::from(AuthError::InvalidCredentials))?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.generate_token(user.id)?;

    tracing::debug!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user_view(&user),
        token,
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(user_view(&user)))
}
