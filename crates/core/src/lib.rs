//! Shared domain types for the forum auth service.
//!
//! - [`types`] -- primitive aliases used across all crates.
//! - [`roles`] -- the user role enum and its wire representation.
//! - [`error`] -- the domain error taxonomy.
//! - [`validation`] -- registration input policy.

pub mod error;
pub mod roles;
pub mod types;
pub mod validation;
