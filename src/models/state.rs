use serde::ser::{Serialize, Serializer};

/// The authentication state tracked by the store.
///
/// A user is present if and only if the state is `LoggedIn`. Values are
/// immutable snapshots: every transition in the store produces a new one.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AuthState<U> {
    #[default]
    LoggedOut,
    LoggedIn { current_user: U },
}

impl<U> AuthState<U> {
    /// A logged-in state for the given user.
    pub fn logged_in(current_user: U) -> Self {
        AuthState::LoggedIn { current_user }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn { .. })
    }

    /// The current user, `None` while logged out.
    pub fn current_user(&self) -> Option<&U> {
        match self {
            AuthState::LoggedIn { current_user } => Some(current_user),
            AuthState::LoggedOut => None,
        }
    }

    pub fn into_current_user(self) -> Option<U> {
        match self {
            AuthState::LoggedIn { current_user } => Some(current_user),
            AuthState::LoggedOut => None,
        }
    }
}

/// Serialises to `{"isLoggedIn": false}` or
/// `{"isLoggedIn": true, "currentUser": ...}`.
impl<U: Serialize> Serialize for AuthState<U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct View<'a, U> {
            is_logged_in: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            current_user: Option<&'a U>,
        }

        View {
            is_logged_in: self.is_logged_in(),
            current_user: self.current_user(),
        }
        .serialize(serializer)
    }
}
