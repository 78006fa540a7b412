//! Role-based access control for UI gating.

pub mod evaluator;
pub mod policies;

pub use aula_entity::user::derive_role;
pub use evaluator::PermissionEvaluator;
pub use policies::{ActionPolicies, ActionPredicate, RoleFlags};
