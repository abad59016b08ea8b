//! Post service: the fundraising feed

use crate::{
    error::AppError,
    models::post::{CreatePostRequest, NewPost, Page, Post, SearchQuery, UpdatePostRequest},
    repository::PostStore,
};
use std::sync::Arc;
use validator::Validate;

pub struct PostService {
    posts: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// Create an unapproved post attributed to `author_id`
    pub async fn create(&self, author_id: i64, req: CreatePostRequest) -> Result<Post, AppError> {
        req.validate()?;

        let post = self
            .posts
            .create(NewPost {
                author_id,
                title: req.title,
                body: req.body,
                money_goal: req.money_goal,
            })
            .await?;

        tracing::info!(post_id = post.id, author_id = author_id, "Post created");

        Ok(post)
    }

    pub async fn get(&self, id: i64) -> Result<Post, AppError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post"))
    }

    pub async fn update(&self, id: i64, req: UpdatePostRequest) -> Result<Post, AppError> {
        req.validate()?;

        self.posts
            .update(id, req.into())
            .await?
            .ok_or_else(|| AppError::not_found("Post"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.posts.delete(id).await? {
            return Err(AppError::not_found("Post"));
        }

        tracing::info!(post_id = id, "Post deleted");

        Ok(())
    }

    pub async fn set_approved(&self, id: i64, approved: bool) -> Result<Post, AppError> {
        let post = self
            .posts
            .set_approved(id, approved)
            .await?
            .ok_or_else(|| AppError::not_found("Post"))?;

        tracing::info!(post_id = id, approved = approved, "Post moderation updated");

        Ok(post)
    }

    /// Public feed
    pub async fn list_approved(&self) -> Result<Vec<Post>, AppError> {
        self.posts.find_by_approved(true).await
    }

    /// Moderation queue
    pub async fn list_pending(&self) -> Result<Vec<Post>, AppError> {
        self.posts.find_by_approved(false).await
    }

    pub async fn list_by_author(
        &self,
        author_id: i64,
        include_unapproved: bool,
    ) -> Result<Vec<Post>, AppError> {
        let mut posts = self.posts.find_by_author(author_id).await?;
        if !include_unapproved {
            posts.retain(|p| p.approved);
        }
        Ok(posts)
    }

    pub async fn search(
        &self,
        query: &SearchQuery,
        include_unapproved: bool,
    ) -> Result<Page<Post>, AppError> {
        let size = query.page_size();
        let (content, total) = self
            .posts
            .search_by_title(
                query.keyword.trim(),
                !include_unapproved,
                i64::from(size),
                query.offset(),
            )
            .await?;

        Ok(Page::new(content, query.page, size, total))
    }
}
