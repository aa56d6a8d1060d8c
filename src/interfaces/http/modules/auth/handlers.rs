//! Admin authentication handlers
//!
//! Login sets the refresh token as an HttpOnly cookie scoped to `/admin`;
//! refresh and logout read it back from the cookie jar.

use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse, TokenResponse,
};
use crate::application::{IdentityService, Session};
use crate::interfaces::http::common::{ApiError, ApiResult, ErrorResponse, ValidatedJson};

pub const REFRESH_COOKIE: &str = "refresh_token";
const COOKIE_PATH: &str = "/admin";

#[derive(Clone)]
pub struct AuthHandlerState {
    pub identity: Arc<IdentityService>,
    /// Set `Secure` on the refresh cookie
    pub cookie_secure: bool,
}

impl AuthHandlerState {
    fn refresh_cookie(&self, token: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build((REFRESH_COOKIE, token))
            .path(COOKIE_PATH)
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(max_age_secs))
            .build()
    }
}

fn token_response(session: &Session) -> TokenResponse {
    TokenResponse {
        access_token: session.access_token.clone(),
        token_type: session.token_type.to_string(),
        expires_in: session.expires_in,
    }
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token; refresh token set as cookie", body = TokenResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<TokenResponse>)> {
    let session = state
        .identity
        .login(&request.email, &request.password)
        .await?;

    let jar = match &session.refresh_token {
        Some(token) => jar.add(state.refresh_cookie(token.clone(), session.refresh_expires_in)),
        None => jar,
    };
    Ok((jar, Json(token_response(&session))))
}

#[utoipa::path(
    post,
    path = "/admin/refresh",
    tag = "Authentication",
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, description = "Missing or invalid refresh cookie", body = ErrorResponse)
    )
)]
pub async fn refresh(
    State(state): State<AuthHandlerState>,
    jar: CookieJar,
) -> ApiResult<Json<TokenResponse>> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("no refresh token"))?;

    let session = state.identity.refresh(&token).await?;
    Ok(Json(token_response(&session)))
}

#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Refresh token revoked and cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<AuthHandlerState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    state
        .identity
        .logout(jar.get(REFRESH_COOKIE).map(|c| c.value()));

    let jar = jar.remove(Cookie::build(REFRESH_COOKIE).path(COOKIE_PATH));
    (jar, Json(MessageResponse::new("logged out")))
}

#[utoipa::path(
    post,
    path = "/admin/forgot-password",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Same answer for every address", body = MessageResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse)
    )
)]
pub async fn forgot_password(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> Json<MessageResponse> {
    Json(MessageResponse::new(
        state.identity.forgot_password(&request.email),
    ))
}

#[utoipa::path(
    post,
    path = "/admin/change-password",
    tag = "Authentication",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Password too short", body = ErrorResponse),
        (status = 401, description = "Invalid or expired reset token", body = ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .identity
        .change_password(&request.token, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new(
        "Password has been reset. Please log in with your new password.",
    )))
}
