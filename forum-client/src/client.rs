use reqwest::{RequestBuilder, Response};

use crate::{
    api::{
        self, Comment, CommentId, NewComment, NewPost, NewSession, NewTopic, NewUser, Post,
        PostId, Session, Topic, TopicId, User,
    },
    CommentForest, LoginInfo,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Api(#[from] api::Error),

    #[error("this action requires being logged in")]
    NotLoggedIn,
}

/// Typed access to the forum's REST API
#[derive(Clone, Debug)]
pub struct ForumClient {
    login: LoginInfo,
    http: reqwest::Client,
}

impl ForumClient {
    pub fn new(host: String) -> ForumClient {
        ForumClient::with_login(LoginInfo::anonymous(host))
    }

    pub fn with_login(login: LoginInfo) -> ForumClient {
        ForumClient {
            login,
            http: reqwest::Client::new(),
        }
    }

    pub fn login_info(&self) -> &LoginInfo {
        &self.login
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.login.host.trim_end_matches('/'), path)
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        match &self.login.token {
            Some(token) => Ok(req.bearer_auth(&token.0)),
            None => Err(Error::NotLoggedIn),
        }
    }

    fn with_search(req: RequestBuilder, search: Option<&str>) -> RequestBuilder {
        match search {
            Some(q) => req.query(&[("q", q)]),
            None => req,
        }
    }

    async fn check(resp: Response) -> Result<Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.bytes().await?;
        let err = api::Error::parse(status, &body);
        tracing::debug!(%status, %err, "request rejected by server");
        Err(Error::Api(err))
    }

    async fn fetch<R>(req: RequestBuilder) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        Ok(Self::check(req.send().await?).await?.json().await?)
    }

    /// For endpoints whose response body, if any, is not interesting
    async fn submit(req: RequestBuilder) -> Result<(), Error> {
        Self::check(req.send().await?).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<(), Error> {
        Self::submit(self.http.get(self.url("/health"))).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, Error> {
        user.validate()?;
        Self::fetch(self.http.post(self.url("/users")).json(user)).await
    }

    /// Logs in, registering `username` if it is not known yet. Following
    /// requests from this client are made as that user.
    pub async fn login(&mut self, session: &NewSession) -> Result<Session, Error> {
        session.validate()?;
        let s: Session = Self::fetch(self.http.post(self.url("/login")).json(session)).await?;
        tracing::info!(user = s.user_id.0, username = %s.username, "logged in");
        self.login = LoginInfo::from_session(self.login.host.clone(), &s);
        Ok(s)
    }

    /// Forgets the current session. Tokens are stateless, so the server is
    /// not involved.
    pub fn logout(&mut self) {
        self.login = LoginInfo::anonymous(self.login.host.clone());
    }

    pub async fn search_topics(&self, search: Option<&str>) -> Result<Vec<Topic>, Error> {
        Self::fetch(Self::with_search(self.http.get(self.url("/topics")), search)).await
    }

    pub async fn topic(&self, topic: TopicId) -> Result<Topic, Error> {
        Self::fetch(self.http.get(self.url(&format!("/topics/{}", topic.0)))).await
    }

    pub async fn create_topic(&self, topic: &NewTopic) -> Result<Topic, Error> {
        topic.validate()?;
        let req = self.authed(self.http.post(self.url("/topics")))?;
        Self::fetch(req.json(topic)).await
    }

    pub async fn delete_topic(&self, topic: TopicId) -> Result<(), Error> {
        let req = self.authed(self.http.delete(self.url(&format!("/topics/{}", topic.0))))?;
        Self::submit(req).await
    }

    /// Posts across all topics
    pub async fn search_posts(&self, search: Option<&str>) -> Result<Vec<Post>, Error> {
        Self::fetch(Self::with_search(self.http.get(self.url("/posts")), search)).await
    }

    pub async fn topic_posts(
        &self,
        topic: TopicId,
        search: Option<&str>,
    ) -> Result<Vec<Post>, Error> {
        let url = self.url(&format!("/topics/{}/posts", topic.0));
        Self::fetch(Self::with_search(self.http.get(url), search)).await
    }

    pub async fn post(&self, post: PostId) -> Result<Post, Error> {
        Self::fetch(self.http.get(self.url(&format!("/posts/{}", post.0)))).await
    }

    pub async fn create_post(&self, topic: TopicId, post: &NewPost) -> Result<Post, Error> {
        post.validate()?;
        let req = self.authed(
            self.http
                .post(self.url(&format!("/topics/{}/posts", topic.0))),
        )?;
        Self::fetch(req.json(post)).await
    }

    pub async fn delete_post(&self, post: PostId) -> Result<(), Error> {
        let req = self.authed(self.http.delete(self.url(&format!("/posts/{}", post.0))))?;
        Self::submit(req).await
    }

    /// Flat list of all comments of `post`, removed ones included
    pub async fn comments(&self, post: PostId) -> Result<Vec<Comment>, Error> {
        Self::fetch(self.http.get(self.url(&format!("/posts/{}/comments", post.0)))).await
    }

    /// Fetches the comments of `post` and threads them
    pub async fn thread(&self, post: PostId) -> Result<CommentForest, Error> {
        let comments = self.comments(post).await?;
        tracing::debug!(post = post.0, num_comments = comments.len(), "building thread");
        Ok(CommentForest::build(comments))
    }

    pub async fn create_comment(
        &self,
        post: PostId,
        comment: &NewComment,
    ) -> Result<Comment, Error> {
        comment.validate()?;
        let req = self.authed(
            self.http
                .post(self.url(&format!("/posts/{}/comments", post.0))),
        )?;
        Self::fetch(req.json(comment)).await
    }

    pub async fn delete_comment(&self, comment: CommentId) -> Result<(), Error> {
        let req = self.authed(
            self.http
                .delete(self.url(&format!("/comments/{}", comment.0))),
        )?;
        Self::submit(req).await
    }
}
