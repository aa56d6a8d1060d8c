//! Admin identity: one shared credential, JWT sessions, password reset.
//!
//! HTTP handlers stay thin and delegate every decision here.

use chrono::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::application::notifications::{Notification, NotificationDispatcher};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, AdminClaims, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::storage::{RefreshTokenStore, ResetTokenStore};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Same answer whether or not the address belongs to the admin.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If this email exists, you will receive a password reset link shortly.";

#[derive(Clone)]
pub struct IdentitySettings {
    pub admin_email: String,
    pub access: JwtConfig,
    pub refresh: JwtConfig,
    pub reset_ttl: Duration,
}

/// Tokens handed out on login or refresh
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    /// Only set on login; refresh keeps the existing cookie.
    pub refresh_token: Option<String>,
    pub refresh_expires_in: i64,
}

pub struct IdentityService {
    settings: IdentitySettings,
    password_hash: RwLock<String>,
    refresh_tokens: RefreshTokenStore,
    reset_tokens: ResetTokenStore,
    notifications: NotificationDispatcher,
}

impl IdentityService {
    /// `password_hash` is a bcrypt hash of the configured admin password.
    pub fn new(
        settings: IdentitySettings,
        password_hash: String,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            settings,
            password_hash: RwLock::new(password_hash),
            refresh_tokens: RefreshTokenStore::new(),
            reset_tokens: ResetTokenStore::new(),
            notifications,
        }
    }

    fn is_admin_email(&self, email: &str) -> bool {
        email.trim().eq_ignore_ascii_case(&self.settings.admin_email)
    }

    // ── Session ────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<Session> {
        let valid = self.is_admin_email(email)
            && verify_password(password, self.password_hash.read().await.as_str());
        if !valid {
            warn!(email = %email.trim(), "Admin login rejected");
            return Err(DomainError::Unauthorized("invalid credentials".into()));
        }

        let (access_token, access) = self.mint(&self.settings.access)?;
        let (refresh_token, refresh) = self.mint(&self.settings.refresh)?;
        if let Some(expires_at) = chrono::DateTime::from_timestamp(refresh.exp, 0) {
            self.refresh_tokens.insert(refresh_token.clone(), expires_at);
        }

        info!("Admin logged in");
        Ok(Session {
            access_token,
            token_type: "Bearer",
            expires_in: access.expires_in_secs(),
            refresh_token: Some(refresh_token),
            refresh_expires_in: refresh.expires_in_secs(),
        })
    }

    /// New access token for a known, unexpired refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<Session> {
        let invalid = || DomainError::Unauthorized("invalid refresh token".into());

        let claims = verify_token(refresh_token, &self.settings.refresh).map_err(|_| invalid())?;
        if !self.refresh_tokens.is_active(refresh_token) {
            return Err(invalid());
        }

        let (access_token, access) = self.mint(&self.settings.access)?;
        Ok(Session {
            access_token,
            token_type: "Bearer",
            expires_in: access.expires_in_secs(),
            refresh_token: None,
            refresh_expires_in: claims.expires_in_secs(),
        })
    }

    pub fn logout(&self, refresh_token: Option<&str>) {
        if let Some(token) = refresh_token {
            if self.refresh_tokens.revoke(token) {
                info!("Admin logged out");
            }
        }
        let purged = self.refresh_tokens.purge_expired() + self.reset_tokens.purge_expired();
        if purged > 0 {
            info!(purged, "Expired tokens purged");
        }
    }

    /// Claims of a valid access token, or 401/403.
    pub fn authorize(&self, access_token: &str) -> DomainResult<AdminClaims> {
        let claims = verify_token(access_token, &self.settings.access)
            .map_err(|_| DomainError::Unauthorized("invalid or expired token".into()))?;
        if !claims.admin {
            return Err(DomainError::Forbidden("admin only".into()));
        }
        Ok(claims)
    }

    fn mint(&self, config: &JwtConfig) -> DomainResult<(String, AdminClaims)> {
        create_token(&self.settings.admin_email, config)
            .map_err(|e| DomainError::internal(format!("failed to create token: {}", e)))
    }

    // ── Password reset ─────────────────────────────────────────

    /// Always succeeds; a reset mail only goes out for the admin address.
    pub fn forgot_password(&self, email: &str) -> &'static str {
        if self.is_admin_email(email) {
            let token = self
                .reset_tokens
                .issue(&self.settings.admin_email, self.settings.reset_ttl);
            self.notifications.dispatch(Notification::PasswordReset {
                email: self.settings.admin_email.clone(),
                token,
            });
            info!("Password reset issued");
        } else {
            warn!(email = %email.trim(), "Password reset requested for unknown email");
        }
        FORGOT_PASSWORD_MESSAGE
    }

    pub async fn change_password(&self, token: &str, new_password: &str) -> DomainResult<()> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let email = self
            .reset_tokens
            .consume(token.trim())
            .ok_or_else(|| DomainError::Unauthorized("invalid or expired reset token".into()))?;

        let hashed = hash_password(new_password)?;
        *self.password_hash.write().await = hashed;

        self.notifications
            .dispatch(Notification::PasswordChanged { email });
        info!("Admin password changed");
        Ok(())
    }
}
