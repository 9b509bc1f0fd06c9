use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use forum_client::api::{
    AuthToken, Comment, CommentId, Error, NewComment, NewPost, NewSession, NewTopic, NewUser,
    Post, PostId, Session, Status, Time, Topic, TopicId, User, UserId,
};
use uuid::Uuid;

mod routes;
pub use routes::{router, spawn, SharedServer};


/// In-memory forum backend, following the rules of the real one closely
/// enough for the client to be tested against it.
pub struct MockServer {
    users: BTreeMap<UserId, User>,
    sessions: HashMap<AuthToken, UserId>,
    topics: BTreeMap<TopicId, DbTopic>,
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    next_id: i64,
    last_time: Option<Time>,
}

#[derive(Debug)]
struct DbTopic {
    topic: Topic,
    created_by: UserId,
}

fn matches_search(search: Option<&str>, fields: &[&str]) -> bool {
    match search.map(|s| s.trim().to_lowercase()) {
        None => true,
        Some(s) if s.is_empty() => true,
        Some(s) => fields.iter().any(|f| f.to_lowercase().contains(&s)),
    }
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            sessions: HashMap::new(),
            topics: BTreeMap::new(),
            posts: BTreeMap::new(),
            comments: BTreeMap::new(),
            next_id: 1,
            last_time: None,
        }
    }

    /// Return the current number of users
    pub fn test_num_users(&self) -> usize {
        self.users.len()
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // Strictly increasing, so that creation order is also date order
    fn now(&mut self) -> Time {
        let mut now = Utc::now();
        if let Some(last) = self.last_time {
            if now <= last {
                now = last + chrono::Duration::milliseconds(1);
            }
        }
        self.last_time = Some(now);
        now
    }

    fn resolve(&self, tok: &AuthToken) -> Result<UserId, Error> {
        self.sessions
            .get(tok)
            .copied()
            .ok_or(Error::Unauthenticated)
    }

    fn username(&self, user: UserId) -> Option<String> {
        self.users.get(&user).map(|u| u.username.clone())
    }

    pub fn create_user(&mut self, u: NewUser) -> Result<User, Error> {
        u.validate()?;
        if self.users.values().any(|known| known.username == u.username) {
            return Err(Error::InvalidInput(format!(
                "username {:?} is already taken",
                u.username
            )));
        }
        let user = User {
            user_id: UserId(self.next_id()),
            username: u.username,
            bio: u.bio,
        };
        self.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    /// Unknown usernames are registered on the fly
    pub fn login(&mut self, s: NewSession) -> Result<Session, Error> {
        s.validate()?;
        let known = self
            .users
            .values()
            .find(|u| u.username == s.username)
            .map(|u| u.user_id);
        let user_id = match known {
            Some(id) => id,
            None => {
                self.create_user(NewUser::new(s.username.clone(), String::new()))?
                    .user_id
            }
        };
        let token = AuthToken(Uuid::new_v4().to_string());
        self.sessions.insert(token.clone(), user_id);
        tracing::debug!(user = user_id.0, "opened session");
        Ok(Session {
            token,
            username: s.username,
            user_id,
        })
    }

    fn with_post_count(&self, t: &DbTopic) -> Topic {
        let mut topic = t.topic.clone();
        topic.post_count = self
            .posts
            .values()
            .filter(|p| p.topic_id == topic.topic_id && p.status.is_active())
            .count() as i64;
        topic
    }

    /// Active topics whose name or description contains `search`
    pub fn search_topics(&self, search: Option<&str>) -> Vec<Topic> {
        self.topics
            .values()
            .filter(|t| t.topic.status.is_active())
            .filter(|t| {
                matches_search(search, &[t.topic.name.as_str(), t.topic.description.as_str()])
            })
            .map(|t| self.with_post_count(t))
            .collect()
    }

    pub fn topic(&self, id: TopicId) -> Result<Topic, Error> {
        self.topics
            .get(&id)
            .map(|t| self.with_post_count(t))
            .ok_or_else(|| Error::NotFound(format!("topic {}", id.0)))
    }

    pub fn create_topic(&mut self, tok: &AuthToken, t: NewTopic) -> Result<Topic, Error> {
        let created_by = self.resolve(tok)?;
        t.validate()?;
        let topic = Topic {
            topic_id: TopicId(self.next_id()),
            name: t.name,
            description: t.description,
            created_at: self.now(),
            status: Status::Active,
            post_count: 0,
        };
        self.topics.insert(
            topic.topic_id,
            DbTopic {
                topic: topic.clone(),
                created_by,
            },
        );
        Ok(topic)
    }

    pub fn delete_topic(&mut self, tok: &AuthToken, id: TopicId) -> Result<(), Error> {
        let user = self.resolve(tok)?;
        let t = self
            .topics
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("topic {}", id.0)))?;
        if t.created_by != user {
            return Err(Error::PermissionDenied);
        }
        t.topic.status = Status::Removed;
        Ok(())
    }

    /// Active posts whose title or body contains `search`, optionally only in
    /// `topic`
    pub fn search_posts(
        &self,
        topic: Option<TopicId>,
        search: Option<&str>,
    ) -> Result<Vec<Post>, Error> {
        if let Some(t) = topic {
            self.topic(t)?;
        }
        Ok(self
            .posts
            .values()
            .filter(|p| p.status.is_active())
            .filter(|p| topic.map(|t| p.topic_id == t).unwrap_or(true))
            .filter(|p| matches_search(search, &[p.title.as_str(), p.body.as_str()]))
            .cloned()
            .collect())
    }

    pub fn post(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("post {}", id.0)))
    }

    pub fn create_post(
        &mut self,
        tok: &AuthToken,
        topic: TopicId,
        p: NewPost,
    ) -> Result<Post, Error> {
        let created_by = self.resolve(tok)?;
        p.validate()?;
        if !self.topic(topic)?.status.is_active() {
            return Err(Error::NotFound(format!("topic {}", topic.0)));
        }
        let post = Post {
            post_id: PostId(self.next_id()),
            topic_id: topic,
            title: p.title,
            body: p.body,
            created_at: self.now(),
            created_by,
            username: self.username(created_by),
            status: Status::Active,
        };
        self.posts.insert(post.post_id, post.clone());
        Ok(post)
    }

    pub fn delete_post(&mut self, tok: &AuthToken, id: PostId) -> Result<(), Error> {
        let user = self.resolve(tok)?;
        let p = self
            .posts
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("post {}", id.0)))?;
        if p.created_by != user {
            return Err(Error::PermissionDenied);
        }
        p.status = Status::Removed;
        Ok(())
    }

    /// All comments of `post`, removed ones included, oldest first
    pub fn comments(&self, post: PostId) -> Result<Vec<Comment>, Error> {
        self.post(post)?;
        let mut res = self
            .comments
            .values()
            .filter(|c| c.post_id == Some(post))
            .cloned()
            .collect::<Vec<_>>();
        res.sort_by_key(|c| (c.created_at, c.id));
        Ok(res)
    }

    pub fn create_comment(
        &mut self,
        tok: &AuthToken,
        post: PostId,
        c: NewComment,
    ) -> Result<Comment, Error> {
        let author_id = self.resolve(tok)?;
        c.validate()?;
        self.post(post)?;
        if let Some(parent) = c.parent_id {
            match self.comments.get(&parent) {
                Some(p) if p.post_id == Some(post) => (),
                _ => {
                    return Err(Error::InvalidInput(format!(
                        "parent comment {} is not part of post {}",
                        parent.0, post.0
                    )))
                }
            }
        }
        let comment = Comment {
            id: CommentId(self.next_id()),
            post_id: Some(post),
            parent_id: c.parent_id,
            body: c.body,
            author_id,
            author_name: self.username(author_id),
            created_at: self.now(),
            status: Status::Active,
        };
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    /// Soft delete: the comment stays listed, with status `removed`
    pub fn delete_comment(&mut self, tok: &AuthToken, id: CommentId) -> Result<(), Error> {
        let user = self.resolve(tok)?;
        let c = self
            .comments
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("comment {}", id.0)))?;
        if c.author_id != user {
            return Err(Error::PermissionDenied);
        }
        c.status = Status::Removed;
        Ok(())
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}
