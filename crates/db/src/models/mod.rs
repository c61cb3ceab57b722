//! Entity models and insert DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and a plain DTO for inserts.

pub mod refresh_token;
pub mod user;
