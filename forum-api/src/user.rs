use crate::Error;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub bio: String,
}

impl NewUser {
    pub fn new(username: String, bio: String) -> NewUser {
        NewUser { username, bio }
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_required("username", &self.username)?;
        crate::validate_string(&self.bio)
    }
}
