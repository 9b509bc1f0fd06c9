use crate::{Error, Status, Time, TopicId, UserId};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct PostId(pub i64);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Post {
    pub post_id: PostId,
    pub topic_id: TopicId,
    pub title: String,
    pub body: String,
    pub created_at: Time,
    pub created_by: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl Post {
    /// Name to display for the author, falling back to the numeric id
    pub fn author(&self) -> String {
        match &self.username {
            Some(name) => name.clone(),
            None => format!("User #{}", self.created_by.0),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_required("title", &self.title)?;
        crate::validate_required("body", &self.body)
    }
}
