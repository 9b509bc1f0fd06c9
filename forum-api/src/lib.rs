use chrono::Utc;

mod auth;
pub use auth::{AuthToken, NewSession, Session};

mod comment;
pub use comment::{Comment, CommentId, NewComment};

mod error;
pub use error::Error;

mod post;
pub use post::{NewPost, Post, PostId};

mod topic;
pub use topic::{NewTopic, Topic, TopicId};

mod user;
pub use user::{NewUser, User, UserId};

pub type Time = chrono::DateTime<Utc>;

/// Lifecycle of a topic, post or comment. Deletion is soft: removed items are
/// still returned by the listings that need them to keep threads intact.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Removed,
}

impl Status {
    pub fn is_active(&self) -> bool {
        matches!(self, Status::Active)
    }
}

impl Default for Status {
    fn default() -> Status {
        Status::Active
    }
}

// Strings travel through a postgres backend, which rejects null bytes
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(String::from(s))),
        false => Ok(()),
    }
}

/// Like `validate_string`, but also refuses strings that are empty once trimmed
pub fn validate_required(field: &str, s: &str) -> Result<(), Error> {
    validate_string(s)?;
    match s.trim().is_empty() {
        true => Err(Error::InvalidInput(format!("{field} is required"))),
        false => Ok(()),
    }
}
