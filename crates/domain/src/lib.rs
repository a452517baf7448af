//! Domain layer - Core entities and validation rules.
//!
//! This crate contains pure domain logic with no infrastructure
//! dependencies. The service and console crates both build on it.

pub mod user;
pub mod validation;

pub use user::{NewUser, UserPatch, UserRecord};
pub use validation::{is_valid_age, is_valid_email, is_valid_name};
