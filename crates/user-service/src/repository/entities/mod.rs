//! SeaORM entity definitions.
//!
//! Database-specific models, separate from the domain entity.

pub mod user;

pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
