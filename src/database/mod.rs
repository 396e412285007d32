pub mod manager;
pub mod memory;
pub mod models;
pub mod posts;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryPostStore;
pub use posts::{PgPostStore, PostStore};
