use crate::error::AppError;
use bcrypt::{hash, verify};

/// Salt and digest of a bcrypt hash no password is expected to match.
const PLACEHOLDER_SALT_AND_DIGEST: &str = "N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

/// A well-formed bcrypt hash at `cost`, for verifying against when there is no real one.
pub fn placeholder_hash(cost: u32) -> String {
    format!("$2b${:02}${}", cost, PLACEHOLDER_SALT_AND_DIGEST)
}

/// Runs a full verification against [`placeholder_hash`] so a missing account costs as
/// much time as a wrong password.
pub fn verify_against_placeholder(password: &str, cost: u32) {
    if let Err(e) = verify_password(password, &placeholder_hash(cost)) {
        log::error!("Placeholder verification failed: {}", e);
    }
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
