//! Storage layer
//! Services depend on the store traits; the backing store is picked at startup.

pub mod memory;
pub mod post_repo;
pub mod user_repo;

pub use memory::MemoryStore;
pub use post_repo::PostRepository;
pub use user_repo::UserRepository;

use crate::{
    error::AppError,
    models::{
        post::{NewPost, Post, PostChanges},
        user::{Account, NewAccount, Profile},
    },
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Accounts and their role profiles
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError>;

    /// Insert the account and its profile together.
    /// A taken username fails with `DuplicateUsername`, including under races.
    async fn create(&self, account: NewAccount, profile: Option<Profile>) -> Result<Account, AppError>;

    async fn find_profile(&self, user_id: i64) -> Result<Option<Profile>, AppError>;
}

/// Fundraising posts. Listings are ordered by id.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, AppError>;

    async fn set_approved(&self, id: i64, approved: bool) -> Result<Option<Post>, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, AppError>;

    async fn find_by_approved(&self, approved: bool) -> Result<Vec<Post>, AppError>;

    /// Case-insensitive title search; returns the page and the total match count.
    /// `approved_only` restricts both to approved posts.
    async fn search_by_title(
        &self,
        keyword: &str,
        approved_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Post>, i64), AppError>;
}

/// Selected backing store
#[derive(Clone)]
pub enum Storage {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

impl Storage {
    pub fn memory() -> Self {
        Storage::Memory(Arc::new(MemoryStore::new()))
    }

    pub fn accounts(&self) -> Arc<dyn AccountStore> {
        match self {
            Storage::Postgres(pool) => Arc::new(UserRepository::new(pool.clone())),
            Storage::Memory(store) => store.clone(),
        }
    }

    pub fn posts(&self) -> Arc<dyn PostStore> {
        match self {
            Storage::Postgres(pool) => Arc::new(PostRepository::new(pool.clone())),
            Storage::Memory(store) => store.clone(),
        }
    }
}
