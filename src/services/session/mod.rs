//! Session collaborator: who is signed in.
//!
//! Authentication itself happens elsewhere; the planner only asks for the
//! current user.

use crate::models::settings::AppSettings;
use crate::models::user::User;
use crate::services::error::RepositoryError;

#[cfg_attr(test, mockall::automock)]
pub trait SessionProvider {
    /// `Ok(None)` when nobody is signed in
    fn current_user(&self) -> Result<Option<User>, RepositoryError>;
}

/// Session with a fixed user, used when the account is configured locally.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<User>,
}

impl StaticSession {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        let user = settings
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(User::new);
        Self { user }
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Result<Option<User>, RepositoryError> {
        Ok(self.user.clone())
    }
}

impl<S: SessionProvider + ?Sized> SessionProvider for &S {
    fn current_user(&self) -> Result<Option<User>, RepositoryError> {
        (**self).current_user()
    }
}
