use crate::{Error, Status, Time};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct TopicId(pub i64);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Topic {
    pub topic_id: TopicId,
    pub name: String,
    pub description: String,
    pub created_at: Time,
    #[serde(default)]
    pub status: Status,

    /// Number of active posts in this topic
    #[serde(default)]
    pub post_count: i64,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewTopic {
    pub name: String,
    pub description: String,
}

impl NewTopic {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_required("name", &self.name)?;
        crate::validate_required("description", &self.description)
    }
}
