//! bcrypt hashing for the admin credential

use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::warn;

use crate::shared::{DomainError, DomainResult};

pub fn hash_password(password: &str) -> DomainResult<String> {
    hash_password_with_cost(password, DEFAULT_COST)
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> DomainResult<String> {
    hash(password, cost).map_err(|e| DomainError::internal(format!("password hashing: {}", e)))
}

/// A malformed hash counts as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or_else(|e| {
        warn!(error = %e, "Password hash verification failed");
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_matches_only_the_original() {
        let hashed = hash_password_with_cost("s3cret!", 4).unwrap();
        assert!(verify_password("s3cret!", &hashed));
        assert!(!verify_password("S3cret!", &hashed));
    }

    #[test]
    fn garbage_hash_is_a_mismatch() {
        assert!(!verify_password("x", "not-a-bcrypt-hash"));
    }
}
