//! User domain entities.

pub mod model;
pub mod role;

pub use model::{RoleRef, UserRecord};
pub use role::{Role, RoleHints, derive_role};
