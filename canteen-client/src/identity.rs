//! Signed-in user identity
//!
//! Votes are attributed by display name. Two users sharing a display name
//! are indistinguishable to duplicate-vote suppression and to the activity
//! filter.

use parking_lot::{Mutex, RwLock};

/// Supplies the current user and sends unauthenticated users to sign in
pub trait Identity: Send + Sync {
    /// Display name of the signed-in user, `None` when signed out
    fn display_name(&self) -> Option<String>;

    /// Navigate to the sign-in entry point
    fn redirect_to_sign_in(&self, route: &str);

    fn is_authenticated(&self) -> bool {
        self.display_name().is_some()
    }
}

/// In-process session: holds the display name and records redirects
#[derive(Debug, Default)]
pub struct Session {
    user: RwLock<Option<String>>,
    redirects: Mutex<Vec<String>>,
}

impl Session {
    /// Signed-out session
    pub fn new() -> Self {
        Self::default()
    }

    /// Session already signed in as `name`
    pub fn signed_in(name: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(name);
        session
    }

    pub fn sign_in(&self, name: impl Into<String>) {
        let name = name.into();
        tracing::info!(user = %name, "Signed in");
        *self.user.write() = Some(name);
    }

    pub fn sign_out(&self) {
        if let Some(name) = self.user.write().take() {
            tracing::info!(user = %name, "Signed out");
        }
    }

    /// Routes this session has been redirected to, oldest first
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }
}

impl Identity for Session {
    fn display_name(&self) -> Option<String> {
        self.user.read().clone()
    }

    fn redirect_to_sign_in(&self, route: &str) {
        tracing::info!(route, "Redirecting to sign-in");
        self.redirects.lock().push(route.to_string());
    }
}
