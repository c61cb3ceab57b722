//! Domain error taxonomy for authentication operations.
//!
//! Variants map 1:1 to client-facing outcomes at the HTTP boundary:
//! validation and conflict errors become 400s, credential and token errors
//! become 401s, and store/signing failures surface as opaque 500s.

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Input violated registration policy (username/password/role rules).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Registration attempted with a username that is already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Unknown username or wrong password. Deliberately a single variant so
    /// callers cannot distinguish the two cases (username enumeration).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Malformed, unsigned, or expired token. The codec does not distinguish
    /// these beyond "invalid".
    #[error("invalid token")]
    InvalidToken,

    /// The token signature verified but its claims payload is malformed
    /// (missing or wrong-typed user id, username, or role).
    #[error("invalid token data")]
    InvalidTokenData,

    /// Refresh token not found in the store, bound to a different user than
    /// its claims assert, or past its stored expiry.
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    /// Opaque persistence failure. Detail is logged server-side only.
    #[error("store error: {0}")]
    Store(String),

    /// Token signing failure. Fatal for the request.
    #[error("signing error: {0}")]
    Signing(String),

    /// Any other internal failure (e.g. password hashing).
    #[error("internal error: {0}")]
    Internal(String),
}
