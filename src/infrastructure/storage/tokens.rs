//! Server-side token registries for the admin session.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::infrastructure::crypto::tokens::generate_reset_token;

/// Refresh tokens currently honoured. Logout removes them.
#[derive(Default)]
pub struct RefreshTokenStore {
    tokens: DashMap<String, DateTime<Utc>>,
}

impl RefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, expires_at: DateTime<Utc>) {
        self.tokens.insert(token.into(), expires_at);
    }

    pub fn is_active(&self, token: &str) -> bool {
        self.tokens
            .get(token)
            .map(|exp| *exp > Utc::now())
            .unwrap_or(false)
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, exp| *exp > now);
        before - self.tokens.len()
    }
}

struct ResetEntry {
    email: String,
    expires_at: DateTime<Utc>,
}

/// One-time password reset tokens.
#[derive(Default)]
pub struct ResetTokenStore {
    tokens: DashMap<String, ResetEntry>,
}

impl ResetTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, email: &str, ttl: Duration) -> String {
        let token = generate_reset_token();
        self.tokens.insert(
            token.clone(),
            ResetEntry {
                email: email.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        token
    }

    /// Remove the token and return its email if it was still valid.
    pub fn consume(&self, token: &str) -> Option<String> {
        let (_, entry) = self.tokens.remove(token)?;
        (entry.expires_at > Utc::now()).then_some(entry.email)
    }

    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, entry| entry.expires_at > now);
        before - self.tokens.len()
    }
}
