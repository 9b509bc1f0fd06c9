use std::{io::Write, path::PathBuf};

use anyhow::Context;
use forum_client::{
    api::{
        AuthToken, CommentId, NewComment, NewPost, NewSession, NewTopic, PostId, TopicId, UserId,
    },
    CommentForest, ForumClient, LoginInfo,
};

mod render;

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long, default_value = "http://localhost:8080")]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Log in, registering the user if needed, and print the session token
    Login {
        /// Username
        name: String,
    },

    /// List topics
    Topics {
        #[structopt(short, long)]
        search: Option<String>,
    },

    /// Create a topic
    CreateTopic { name: String, description: String },

    /// Delete one of your topics
    DeleteTopic { topic: i64 },

    /// List posts, optionally only those of one topic
    Posts {
        #[structopt(short, long)]
        topic: Option<i64>,

        #[structopt(short, long)]
        search: Option<String>,
    },

    /// Create a post in a topic
    CreatePost {
        topic: i64,
        title: String,
        body: String,
    },

    /// Delete one of your posts
    DeletePost { post: i64 },

    /// Show a post with its threaded comments
    Show { post: i64 },

    /// Comment on a post
    Comment {
        post: i64,
        body: String,

        /// Comment to reply to
        #[structopt(short, long)]
        reply_to: Option<i64>,
    },

    /// Delete one of your comments
    DeleteComment { comment: i64 },

    /// Thread and print a JSON list of comments, without contacting the server
    Render { file: PathBuf },
}

/// Session of the current user, as printed by `login`. Reading commands work
/// without it.
fn login_info(host: String) -> anyhow::Result<LoginInfo> {
    let tok = match std::env::var("FORUM_TOKEN") {
        Ok(tok) => tok,
        Err(std::env::VarError::NotPresent) => return Ok(LoginInfo::anonymous(host)),
        Err(e) => return Err(e).context("retrieving FORUM_TOKEN environment variable"),
    };
    let user = match std::env::var("FORUM_USER") {
        Ok(user) => Some(UserId(
            user.parse().context("parsing FORUM_USER as a user id")?,
        )),
        Err(_) => None,
    };
    Ok(LoginInfo {
        host,
        token: Some(AuthToken(tok)),
        user,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let login = login_info(opt.host)?;
    let mut client = ForumClient::with_login(login.clone());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match opt.cmd {
        Command::Login { name } => {
            let s = client.login(&NewSession::new(name)).await?;
            writeln!(out, "export FORUM_TOKEN={}", s.token.0)?;
            writeln!(out, "export FORUM_USER={}", s.user_id.0)?;
        }
        Command::Topics { search } => {
            let topics = client.search_topics(search.as_deref()).await?;
            render::topics(&mut out, &topics)?;
        }
        Command::CreateTopic { name, description } => {
            let t = client
                .create_topic(&NewTopic { name, description })
                .await?;
            writeln!(out, "created topic #{}", t.topic_id.0)?;
        }
        Command::DeleteTopic { topic } => client.delete_topic(TopicId(topic)).await?,
        Command::Posts { topic, search } => {
            let posts = match topic {
                Some(t) => client.topic_posts(TopicId(t), search.as_deref()).await?,
                None => client.search_posts(search.as_deref()).await?,
            };
            render::posts(&mut out, &posts, &login)?;
        }
        Command::CreatePost { topic, title, body } => {
            let p = client
                .create_post(TopicId(topic), &NewPost { title, body })
                .await?;
            writeln!(out, "created post #{}", p.post_id.0)?;
        }
        Command::DeletePost { post } => client.delete_post(PostId(post)).await?,
        Command::Show { post } => {
            let p = client.post(PostId(post)).await?;
            let forest = client.thread(PostId(post)).await?;
            render::post(&mut out, &p)?;
            render::thread(&mut out, &forest, &login)?;
        }
        Command::Comment {
            post,
            body,
            reply_to,
        } => {
            let c = match reply_to {
                Some(parent) => NewComment::reply(CommentId(parent), body),
                None => NewComment::top_level(body),
            };
            let c = client.create_comment(PostId(post), &c).await?;
            writeln!(out, "created comment #{}", c.id.0)?;
        }
        Command::DeleteComment { comment } => {
            client.delete_comment(CommentId(comment)).await?
        }
        Command::Render { file } => {
            let comments = render::load_comments(&file)?;
            tracing::debug!(num_comments = comments.len(), "loaded comments");
            render::thread(&mut out, &CommentForest::build(comments), &login)?;
        }
    }

    Ok(())
}
