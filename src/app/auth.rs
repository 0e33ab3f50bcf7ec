//! Session-backed authentication.
//!
//! The logged-in user is the `uid` session key; nothing else is stored.

use crate::app::models::{User, UserStore};
use crate::session::Session;

const UID_KEY: &str = "uid";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("account does not exist")]
    UnknownAccount,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("no session attached to request")]
    NoSession,

    #[error("failed to write session: {0}")]
    Session(#[from] serde_json::Error),
}

/// Verify credentials and log the user in.
pub async fn attempt(
    users: &UserStore,
    session: Option<&Session>,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = users.by_email(email).ok_or(AuthError::UnknownAccount)?;
    if !user.compare_password(password).await {
        tracing::info!(user_id = user.id, "Login rejected: incorrect password");
        return Err(AuthError::IncorrectPassword);
    }
    login(session, &user)?;
    Ok(user)
}

/// Record `user` as logged in. The session gets a new id so an id issued
/// before authentication cannot be reused after it.
pub fn login(session: Option<&Session>, user: &User) -> Result<(), AuthError> {
    let session = session.ok_or(AuthError::NoSession)?;
    session.regenerate();
    session.insert(UID_KEY, user.id)?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(())
}

pub fn logout(session: Option<&Session>) {
    if let Some(session) = session {
        if let Some(uid) = session.remove(UID_KEY) {
            tracing::info!(user_id = %uid, "User logged out");
        }
    }
}

/// The logged-in user, if the session names one that still exists.
pub fn current_user(users: &UserStore, session: Option<&Session>) -> Option<User> {
    let uid: u64 = session?.get(UID_KEY)?;
    users.get(uid).ok()
}
