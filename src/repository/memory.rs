//! In-memory store
//! Backs the `memory` storage backend and the integration tests.

use crate::{
    error::AppError,
    models::{
        post::{NewPost, Post, PostChanges},
        user::{Account, NewAccount, Profile},
    },
    repository::{AccountStore, PostStore},
};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicI64, Ordering};

pub struct MemoryStore {
    // keyed by username so the entry API gives an atomic uniqueness check
    accounts: DashMap<String, Account>,
    usernames_by_id: DashMap<i64, String>,
    profiles: DashMap<i64, Profile>,
    posts: DashMap<i64, Post>,
    next_account_id: AtomicI64,
    next_post_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            usernames_by_id: DashMap::new(),
            profiles: DashMap::new(),
            posts: DashMap::new(),
            next_account_id: AtomicI64::new(1),
            next_post_id: AtomicI64::new(1),
        }
    }

    fn sorted_posts(&self, filter: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        posts.sort_by_key(|p| p.id);
        posts
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        Ok(self.accounts.get(username).map(|a| a.value().clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let username = self.usernames_by_id.get(&id).map(|u| u.value().clone());
        Ok(username.and_then(|u| self.accounts.get(&u).map(|a| a.value().clone())))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.accounts.contains_key(username))
    }

    async fn create(&self, account: NewAccount, profile: Option<Profile>) -> Result<Account, AppError> {
        match self.accounts.entry(account.username.clone()) {
            Entry::Occupied(_) => Err(AppError::DuplicateUsername),
            Entry::Vacant(slot) => {
                let id = self.next_account_id.fetch_add(1, Ordering::SeqCst);
                let created = Account {
                    id,
                    username: account.username,
                    password_hash: account.password_hash,
                    role: account.role,
                };

                if let Some(profile) = profile {
                    self.profiles.insert(id, profile);
                }
                self.usernames_by_id.insert(id, created.username.clone());
                slot.insert(created.clone());

                Ok(created)
            }
        }
    }

    async fn find_profile(&self, user_id: i64) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.get(&user_id).map(|p| p.value().clone()))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        let id = self.next_post_id.fetch_add(1, Ordering::SeqCst);
        let created = Post {
            id,
            author_id: post.author_id,
            title: post.title,
            body: post.body,
            money_goal: post.money_goal,
            approved: false,
        };
        self.posts.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        Ok(self.posts.get(&id).map(|p| p.value().clone()))
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, AppError> {
        Ok(self.posts.get_mut(&id).map(|mut post| {
            post.title = changes.title;
            post.body = changes.body;
            post.money_goal = changes.money_goal;
            post.clone()
        }))
    }

    async fn set_approved(&self, id: i64, approved: bool) -> Result<Option<Post>, AppError> {
        Ok(self.posts.get_mut(&id).map(|mut post| {
            post.approved = approved;
            post.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.posts.remove(&id).is_some())
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, AppError> {
        Ok(self.sorted_posts(|p| p.author_id == author_id))
    }

    async fn find_by_approved(&self, approved: bool) -> Result<Vec<Post>, AppError> {
        Ok(self.sorted_posts(|p| p.approved == approved))
    }

    async fn search_by_title(
        &self,
        keyword: &str,
        approved_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Post>, i64), AppError> {
        let needle = keyword.to_lowercase();
        let matches = self.sorted_posts(|p| {
            (p.approved || !approved_only) && p.title.to_lowercase().contains(&needle)
        });
        let total = matches.len() as i64;

        let page = matches
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }
}
