use crate::{Error, PostId, Status, Time, UserId};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub i64);

/// One comment as listed by `GET /posts/{id}/comments`. The list is flat:
/// threading is carried by `parent_id` only.
///
/// Field names follow the backend (`comment_id`, `commented_by`), and the
/// shorter `id`/`author_id`/`author_name` spellings are accepted as well.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    #[serde(rename = "comment_id", alias = "id")]
    pub id: CommentId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,

    /// None for top-level comments
    #[serde(default)]
    pub parent_id: Option<CommentId>,

    pub body: String,

    #[serde(rename = "commented_by", alias = "author_id")]
    pub author_id: UserId,

    #[serde(
        default,
        alias = "username",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_name: Option<String>,

    pub created_at: Time,

    pub status: Status,
}

impl Comment {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Name to display for the author, falling back to the numeric id
    pub fn author(&self) -> String {
        match &self.author_name {
            Some(name) => name.clone(),
            None => format!("User #{}", self.author_id.0),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub body: String,
    pub parent_id: Option<CommentId>,
}

impl NewComment {
    pub fn top_level(body: String) -> NewComment {
        NewComment {
            body,
            parent_id: None,
        }
    }

    pub fn reply(parent_id: CommentId, body: String) -> NewComment {
        NewComment {
            body,
            parent_id: Some(parent_id),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_required("body", &self.body)
    }
}
