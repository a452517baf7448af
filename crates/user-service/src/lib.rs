//! User service library.
//!
//! Turns raw, untrusted field values into durable, uniquely-keyed
//! user records: validation, uniqueness checks, and transactional
//! persistence behind a typed error boundary. Consumed by the
//! interactive console in `crates/console`.

pub mod errors;
pub mod infra;
pub mod repository;
pub mod service;

pub use errors::{AppError, AppResult};
pub use infra::Database;
pub use repository::{UserRepository, UserStore};
pub use service::{UserManager, UserService};

#[cfg(feature = "test-utils")]
pub use repository::MockUserRepository;
