//! Admin authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::application::IdentityService;
use crate::infrastructure::crypto::jwt::AdminClaims;
use crate::interfaces::http::common::ApiError;

#[derive(Clone)]
pub struct AdminAuthState {
    pub identity: Arc<IdentityService>,
}

/// Verified admin, available to handlers as `Extension<AuthenticatedAdmin>`
#[derive(Clone, Debug)]
pub struct AuthenticatedAdmin {
    pub email: String,
}

impl From<AdminClaims> for AuthenticatedAdmin {
    fn from(claims: AdminClaims) -> Self {
        Self {
            email: claims.email,
        }
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Require `Authorization: Bearer <access token>` carrying the admin claim.
pub async fn admin_auth_middleware(
    State(state): State<AdminAuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return ApiError::unauthorized("missing token").into_response();
    };

    let Some(token) = extract_token(auth_header) else {
        return ApiError::unauthorized("invalid authorization header").into_response();
    };

    match state.identity.authorize(token) {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(AuthenticatedAdmin::from(claims));
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Admin request rejected");
            ApiError::from(e).into_response()
        }
    }
}
