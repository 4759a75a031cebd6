//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use serde::{Deserialize, Serialize};
use userhub_auth::{LoginInput, RegisterInput};
use userhub_core::models::account::{Profile, ProfileUpdate};
use userhub_core::repository::AccountRepository;

use crate::AppState;
use crate::error::ApiError;

pub const MISSING_HEADER_MESSAGE: &str = "Authorization header is missing";
pub const MISSING_TOKEN_MESSAGE: &str = "JWT token is missing";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub phone_number: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn register<R: AccountRepository>(
    State(state): State<AppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::BadRequest)?;

    let output = state
        .identity
        .register(RegisterInput {
            phone_number: req.phone_number,
            full_name: req.full_name,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: output.user_id,
        }),
    ))
}

pub async fn login<R: AccountRepository>(
    State(state): State<AppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::BadRequest)?;

    let output = state
        .identity
        .login(LoginInput {
            phone_number: req.phone_number,
            password: req.password,
        })
        .await
        .map_err(ApiError::Login)?;

    Ok(Json(LoginResponse {
        token: output.token,
        expires_in: output.expires_in,
    }))
}

pub async fn get_profile<R: AccountRepository>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
) -> Result<Json<Profile>, ApiError> {
    let token = bearer_token(&headers)?;
    let profile = state.identity.get_profile(token).await?;
    Ok(Json(profile))
}

pub async fn update_profile<R: AccountRepository>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Profile>, ApiError> {
    let token = bearer_token(&headers)?;
    let Json(update) = payload.map_err(|_| ApiError::BadRequest)?;
    let profile = state.identity.update_profile(token, update).await?;
    Ok(Json(profile))
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// Only the first whitespace-separated word after the scheme is used.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::MissingToken(MISSING_HEADER_MESSAGE))?;
    if value.is_empty() {
        return Err(ApiError::MissingToken(MISSING_HEADER_MESSAGE));
    }

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or(ApiError::MissingToken(MISSING_TOKEN_MESSAGE))
}
