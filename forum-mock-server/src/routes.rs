use std::{net::SocketAddr, sync::Arc};

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use forum_client::api::{
    AuthToken, Comment, CommentId, Error as ApiError, NewComment, NewPost, NewSession, NewTopic,
    NewUser, Post, PostId, Session, Topic, TopicId, User,
};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::MockServer;

pub type SharedServer = Arc<Mutex<MockServer>>;

#[derive(Debug)]
pub struct Error(pub ApiError);

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Error {
        Error(e)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::info!("returning error to client: {}", self.0);
        (
            self.0.status_code(),
            [(header::CONTENT_TYPE, "application/json")],
            self.0.contents(),
        )
            .into_response()
    }
}

/// Bearer token of the request. Whether it belongs to a live session is
/// decided by `MockServer` itself.
pub struct Auth(pub AuthToken);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<Auth, Error> {
        let unauthenticated = || Error(ApiError::Unauthenticated);
        let auth = req
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(unauthenticated)?
            .to_str()
            .map_err(|_| unauthenticated())?;
        let mut auth = auth.split(' ');
        if !auth
            .next()
            .ok_or_else(unauthenticated)?
            .eq_ignore_ascii_case("bearer")
        {
            return Err(unauthenticated());
        }
        let token = auth.next().ok_or_else(unauthenticated)?;
        if auth.next().is_some() || token.is_empty() {
            return Err(unauthenticated());
        }
        Ok(Auth(AuthToken(String::from(token))))
    }
}

#[derive(serde::Deserialize)]
pub struct Search {
    q: Option<String>,
}

pub fn router(server: SharedServer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users", post(create_user))
        .route("/login", post(login))
        .route("/topics", get(search_topics).post(create_topic))
        .route("/topics/:topic_id", get(topic).delete(delete_topic))
        .route("/topics/:topic_id/posts", get(topic_posts).post(create_post))
        .route("/posts", get(search_posts))
        .route("/posts/:post_id", get(get_post).delete(delete_post))
        .route("/posts/:post_id/comments", get(comments).post(create_comment))
        .route("/comments/:comment_id", delete(delete_comment))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// Serves `server` on an ephemeral port of the loopback interface, in the
/// background of the current tokio runtime
pub fn spawn(server: SharedServer) -> Result<SocketAddr, hyper::Error> {
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let server = axum::Server::try_bind(&addr)?.serve(router(server).into_make_service());
    let addr = server.local_addr();
    tracing::debug!(%addr, "mock server listening");
    tokio::spawn(async move {
        if let Err(err) = server.await {
            tracing::error!(?err, "mock server stopped");
        }
    });
    Ok(addr)
}

async fn health() -> &'static str {
    "ok"
}

async fn create_user(
    State(server): State<SharedServer>,
    Json(data): Json<NewUser>,
) -> Result<Json<User>, Error> {
    Ok(Json(server.lock().await.create_user(data)?))
}

async fn login(
    State(server): State<SharedServer>,
    Json(data): Json<NewSession>,
) -> Result<Json<Session>, Error> {
    Ok(Json(server.lock().await.login(data)?))
}

async fn search_topics(
    State(server): State<SharedServer>,
    Query(s): Query<Search>,
) -> Json<Vec<Topic>> {
    Json(server.lock().await.search_topics(s.q.as_deref()))
}

async fn topic(
    State(server): State<SharedServer>,
    Path(topic_id): Path<i64>,
) -> Result<Json<Topic>, Error> {
    Ok(Json(server.lock().await.topic(TopicId(topic_id))?))
}

async fn create_topic(
    Auth(token): Auth,
    State(server): State<SharedServer>,
    Json(data): Json<NewTopic>,
) -> Result<Json<Topic>, Error> {
    Ok(Json(server.lock().await.create_topic(&token, data)?))
}

async fn delete_topic(
    Auth(token): Auth,
    State(server): State<SharedServer>,
    Path(topic_id): Path<i64>,
) -> Result<(), Error> {
    Ok(server
        .lock()
        .await
        .delete_topic(&token, TopicId(topic_id))?)
}

async fn topic_posts(
    State(server): State<SharedServer>,
    Path(topic_id): Path<i64>,
    Query(s): Query<Search>,
) -> Result<Json<Vec<Post>>, Error> {
    Ok(Json(
        server
            .lock()
            .await
            .search_posts(Some(TopicId(topic_id)), s.q.as_deref())?,
    ))
}

async fn create_post(
    Auth(token): Auth,
    State(server): State<SharedServer>,
    Path(topic_id): Path<i64>,
    Json(data): Json<NewPost>,
) -> Result<Json<Post>, Error> {
    Ok(Json(
        server
            .lock()
            .await
            .create_post(&token, TopicId(topic_id), data)?,
    ))
}

async fn search_posts(
    State(server): State<SharedServer>,
    Query(s): Query<Search>,
) -> Result<Json<Vec<Post>>, Error> {
    Ok(Json(server.lock().await.search_posts(None, s.q.as_deref())?))
}

async fn get_post(
    State(server): State<SharedServer>,
    Path(post_id): Path<i64>,
) -> Result<Json<Post>, Error> {
    Ok(Json(server.lock().await.post(PostId(post_id))?))
}

async fn delete_post(
    Auth(token): Auth,
    State(server): State<SharedServer>,
    Path(post_id): Path<i64>,
) -> Result<(), Error> {
    Ok(server.lock().await.delete_post(&token, PostId(post_id))?)
}

async fn comments(
    State(server): State<SharedServer>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, Error> {
    Ok(Json(server.lock().await.comments(PostId(post_id))?))
}

async fn create_comment(
    Auth(token): Auth,
    State(server): State<SharedServer>,
    Path(post_id): Path<i64>,
    Json(data): Json<NewComment>,
) -> Result<Json<Comment>, Error> {
    Ok(Json(
        server
            .lock()
            .await
            .create_comment(&token, PostId(post_id), data)?,
    ))
}

async fn delete_comment(
    Auth(token): Auth,
    State(server): State<SharedServer>,
    Path(comment_id): Path<i64>,
) -> Result<(), Error> {
    Ok(server
        .lock()
        .await
        .delete_comment(&token, CommentId(comment_id))?)
}
