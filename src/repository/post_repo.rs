//! Post repository

use crate::{
    error::AppError,
    models::post::{NewPost, Post, PostChanges},
    repository::PostStore,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

const POST_COLUMNS: &str = "id, author_id, title, body, money_goal, approved";

pub struct PostRepository {
    db: PgPool,
}

impl PostRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// `%` and `_` in user input are matched literally
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        let created = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (author_id, title, body, money_goal, approved)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.money_goal)
        .fetch_one(&self.db)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(post)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = $2, body = $3, money_goal = $4
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.body)
        .bind(changes.money_goal)
        .fetch_optional(&self.db)
        .await?;

        Ok(post)
    }

    async fn set_approved(&self, id: i64, approved: bool) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "UPDATE posts SET approved = $2 WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(approved)
        .fetch_optional(&self.db)
        .await?;

        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = $1 ORDER BY id"
        ))
        .bind(author_id)
        .fetch_all(&self.db)
        .await?;

        Ok(posts)
    }

    async fn find_by_approved(&self, approved: bool) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE approved = $1 ORDER BY id"
        ))
        .bind(approved)
        .fetch_all(&self.db)
        .await?;

        Ok(posts)
    }

    async fn search_by_title(
        &self,
        keyword: &str,
        approved_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Post>, i64), AppError> {
        let pattern = like_pattern(keyword);

        let total: i64 = sqlx::query(
            "SELECT COUNT(*) FROM posts WHERE title ILIKE $1 AND (approved OR NOT $2)",
        )
        .bind(&pattern)
        .bind(approved_only)
        .fetch_one(&self.db)
        .await?
        .try_get(0)?;

        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE title ILIKE $1 AND (approved OR NOT $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(&pattern)
        .bind(approved_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok((posts, total))
    }
}
