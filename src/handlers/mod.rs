pub mod posts;
pub mod system;

pub use posts::{post_create, post_get, posts_list, PostListResponse};
pub use system::{health, root};
