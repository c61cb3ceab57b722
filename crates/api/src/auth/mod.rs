//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- the token codec: HS256 claims signing and verification.

pub mod jwt;
pub mod password;
