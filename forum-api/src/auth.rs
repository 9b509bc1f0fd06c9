use crate::{Error, UserId};

/// Login request. The forum only knows usernames: logging in with an unknown
/// name registers it.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewSession {
    pub username: String,
}

impl NewSession {
    pub fn new(username: String) -> NewSession {
        NewSession { username }
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_required("username", &self.username)
    }
}

/// Bearer token handed out by `/login`, opaque to the client
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct AuthToken(pub String);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Session {
    pub token: AuthToken,
    pub username: String,
    pub user_id: UserId,
}
