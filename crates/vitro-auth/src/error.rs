//! Authentication error types.
//!
//! A failed login is not represented here — it is a normal outcome
//! ([`crate::service::LoginOutcome::InvalidCredentials`]), not a fault.

use thiserror::Error;
use vitro_core::error::VitroError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for VitroError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Crypto(msg) => VitroError::Crypto(msg),
        }
    }
}
