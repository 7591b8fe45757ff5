//! Registry error types.

use thiserror::Error;

/// Errors that can occur in the name registry.
///
/// All variants are caller-recoverable validation failures; a failed
/// operation leaves the registry untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Already registered")]
    AlreadyRegistered,

    #[error("Name not found")]
    NotFound,

    #[error("Only owner can modify this name")]
    NotOwner,

    #[error("Too early to renew")]
    TooEarly,

    #[error("Expiry arithmetic overflow")]
    Overflow,
}
