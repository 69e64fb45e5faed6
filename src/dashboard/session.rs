use crate::models::SessionUser;

/// AuthContext
///
/// The dashboard's view of the login collaborator: who is signed in, and a way to sign out.
pub trait AuthContext {
    fn user(&self) -> Option<SessionUser>;
    fn logout(&mut self);
}

/// StaticSession
///
/// An `AuthContext` whose user is fixed at construction, e.g. from CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSession {
    user: Option<SessionUser>,
}

impl StaticSession {
    pub fn signed_in(id: i32, role_id: i32) -> Self {
        Self {
            user: Some(SessionUser { id, role_id }),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Swaps the signed-in user, as a re-login under another role would.
    pub fn switch_user(&mut self, user: Option<SessionUser>) {
        self.user = user;
    }
}

impl AuthContext for StaticSession {
    fn user(&self) -> Option<SessionUser> {
        self.user
    }

    fn logout(&mut self) {
        self.user = None;
    }
}
