pub mod post;

pub use post::{NewPost, Post, PostRow, PostStatus, PostSummary};
