//! Session lifecycle: restore, login, logout, and refresh-on-401.

pub mod manager;
pub mod model;
pub mod profile;
pub mod redirect;
pub mod wire;

pub use manager::SessionManager;
pub use model::Session;
pub use redirect::LoginRedirect;
pub use wire::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};

/// Storage key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key holding the JSON user snapshot.
pub const USER_DATA_KEY: &str = "userData";

/// Every key that belongs to a session; written and cleared together.
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_DATA_KEY];
