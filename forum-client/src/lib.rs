mod client;
pub use client::{Error, ForumClient};

mod order;
pub use order::{Order, OrderType};

mod session;
pub use session::LoginInfo;

mod thread;
pub use thread::ThreadEntry;

mod tree;
pub use tree::{CommentForest, CommentNode, NodeId, Visibility};

pub mod api {
    pub use forum_api::*;
}
