use crate::api::{AuthToken, Comment, Post, Session, UserId};

/// Where to reach the forum, and as whom. The current user is always passed
/// around explicitly with this struct.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoginInfo {
    pub host: String,
    pub token: Option<AuthToken>,
    pub user: Option<UserId>,
}

impl LoginInfo {
    pub fn anonymous(host: String) -> LoginInfo {
        LoginInfo {
            host,
            token: None,
            user: None,
        }
    }

    pub fn from_session(host: String, session: &Session) -> LoginInfo {
        LoginInfo {
            host,
            token: Some(session.token.clone()),
            user: Some(session.user_id),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Creating topics, posts and comments only needs a session
    pub fn can_write(&self) -> bool {
        self.is_logged_in()
    }

    /// Only the author may delete a comment, and only once
    pub fn can_delete_comment(&self, c: &Comment) -> bool {
        self.is_logged_in() && self.user == Some(c.author_id) && c.is_active()
    }

    pub fn can_delete_post(&self, p: &Post) -> bool {
        self.is_logged_in() && self.user == Some(p.created_by) && p.status.is_active()
    }
}
