use crate::model::User;

/// Application-wide state shared by every screen: who is playing.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    user: Option<User>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Discard the identity; returns the user that was logged in
    pub fn logout(&mut self) -> Option<User> {
        self.user.take()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }
}
