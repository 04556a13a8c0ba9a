//! Authentication handlers.
//!
//! Accounts start inactive; a registration creates an activation token
//! whose link is written to the log (mail delivery is out of scope).
//! Login only succeeds for activated accounts. Password resets follow
//! the same single-use token mechanism.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use utoipa;

use crate::auth::{hash_password, verify_password};
use crate::db::{
    AccountTokenRepository, NewAccountToken, NewUser, TokenPurpose, UserRepository, UserUpdate,
};
use crate::web::dto::{
    ApiResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest, ResetPasswordRequest, UserInfo, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{AuthUser, JwtClaims};

/// Issue a JWT for a user.
fn issue_token(state: &AppState, user_id: i64, email: &str) -> Result<String, ApiError> {
    let now = Utc::now().timestamp() as u64;
    let claims = JwtClaims {
        sub: user_id,
        email: email.to_string(),
        iat: now,
        exp: now + state.jwt_expiry_secs,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to encode JWT: {}", e);
        ApiError::internal("Failed to generate token")
    })
}

/// SQL-format expiry timestamp a number of seconds from now.
fn expiry_from_now(secs: u64) -> String {
    (Utc::now() + Duration::seconds(secs as i64))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// POST /api/auth/register - Register a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, activation required", body = MessageResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ApiError> {
    let user_repo = UserRepository::new(state.db.pool());

    if user_repo.email_exists(&payload.email).await? {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let user = user_repo
        .create(&NewUser::new(
            &payload.email,
            &password_hash,
            &payload.first_name,
            &payload.last_name,
        ))
        .await?;

    // Activation token, delivered out-of-band
    let token_repo = AccountTokenRepository::new(state.db.pool());
    let token = token_repo
        .create(&NewAccountToken {
            user_id: user.id,
            token: uuid::Uuid::new_v4().to_string(),
            purpose: TokenPurpose::Activation,
            expires_at: expiry_from_now(state.activation_token_expiry_secs),
        })
        .await?;

    tracing::info!(
        user_id = user.id,
        "activation link: {}/api/auth/verify/{}",
        state.base_url,
        token.token
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(MessageResponse::new(
            "Account created. Check your email to activate it.",
        ))),
    ))
}

/// GET /api/auth/verify/:token - Activate an account.
#[utoipa::path(
    get,
    path = "/auth/verify/{token}",
    tag = "auth",
    params(
        ("token" = String, Path, description = "Activation token")
    ),
    responses(
        (status = 200, description = "Account activated", body = MessageResponse),
        (status = 404, description = "Invalid or expired token")
    )
)]
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let token_repo = AccountTokenRepository::new(state.db.pool());
    let consumed = token_repo
        .consume(&token, TokenPurpose::Activation)
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid or expired activation token"))?;

    let user_repo = UserRepository::new(state.db.pool());
    if !user_repo.activate(consumed.user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = consumed.user_id, "account activated");

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Account activated. You can now log in.",
    ))))
}

/// POST /api/auth/login - Authenticate and receive a JWT.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials or inactive account"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let user_repo = UserRepository::new(state.db.pool());

    // Same error for unknown email and wrong password
    let user = user_repo
        .get_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    verify_password(&payload.password, &user.password)
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Account not activated"));
    }

    user_repo.update_last_login(user.id).await?;

    let token = issue_token(&state, user.id, &user.email)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(ApiResponse::new(LoginResponse {
        token,
        expires_in: state.jwt_expiry_secs,
        user: UserInfo::from(&user),
    })))
}

/// POST /api/auth/forgot-password - Request a password reset link.
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link issued if the account exists", body = MessageResponse),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let user_repo = UserRepository::new(state.db.pool());

    // The response never reveals whether the email is registered
    if let Some(user) = user_repo.get_by_email(&payload.email).await? {
        let token_repo = AccountTokenRepository::new(state.db.pool());
        let token = token_repo
            .create(&NewAccountToken {
                user_id: user.id,
                token: uuid::Uuid::new_v4().to_string(),
                purpose: TokenPurpose::PasswordReset,
                expires_at: expiry_from_now(state.reset_token_expiry_secs),
            })
            .await?;

        tracing::info!(
            user_id = user.id,
            "password reset link: {}/api/auth/reset-password/{}",
            state.base_url,
            token.token
        );
    }

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "If that email is registered, a reset link has been sent.",
    ))))
}

/// POST /api/auth/reset-password/:token - Set a new password.
#[utoipa::path(
    post,
    path = "/auth/reset-password/{token}",
    tag = "auth",
    params(
        ("token" = String, Path, description = "Password reset token")
    ),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 404, description = "Invalid or expired token"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let token_repo = AccountTokenRepository::new(state.db.pool());
    let consumed = token_repo
        .consume(&token, TokenPurpose::PasswordReset)
        .await?
        .ok_or_else(|| ApiError::not_found("Invalid or expired reset token"))?;

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let user_repo = UserRepository::new(state.db.pool());
    user_repo
        .update(consumed.user_id, &UserUpdate::new().password(&password_hash))
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(user_id = consumed.user_id, "password reset completed");

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Password updated. You can now log in.",
    ))))
}

/// GET /api/auth/me - Current user information.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user_repo = UserRepository::new(state.db.pool());
    let user = user_repo
        .get_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;

    Ok(Json(ApiResponse::new(UserInfo::from(&user))))
}
