//! Navigation collaborator invoked when a session cannot be recovered.

/// Sends the user to the login entry point.
pub trait LoginRedirect: Send + Sync + std::fmt::Debug + 'static {
    /// Called once per unrecoverable authentication failure.
    fn redirect_to_login(&self);
}
