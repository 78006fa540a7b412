//! # aula-auth
//!
//! Client-side authentication and authorization for the Aula academic
//! client.
//!
//! ## Modules
//!
//! - `jwt`: unverified claim decoding and expiry checks
//! - `storage`: durable session storage backends (memory, file)
//! - `session`: session lifecycle (restore, login, logout, refresh-on-401)
//! - `rbac`: role flags, the action table, and the permission evaluator

pub mod jwt;
pub mod rbac;
pub mod session;
pub mod storage;

pub use jwt::{Claims, JwtDecoder};
pub use rbac::{ActionPolicies, PermissionEvaluator, RoleFlags};
pub use session::{LoginRedirect, LoginResponse, Session, SessionManager};
pub use storage::{FileSessionStorage, MemorySessionStorage};
