//! Post domain models

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Fundraising post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub money_goal: Option<f64>,
    pub approved: bool,
}

/// Post about to be inserted. New posts always start unapproved.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub body: String,
    pub money_goal: Option<f64>,
}

/// Editable fields of an existing post
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub body: String,
    pub money_goal: Option<f64>,
}

/// Create post request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Body must not be empty"))]
    pub body: String,
    #[validate(range(min = 0.0, message = "Money goal must not be negative"))]
    pub money_goal: Option<f64>,
    /// Honored for admins only
    pub author_id: Option<i64>,
}

/// Update post request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Body must not be empty"))]
    pub body: String,
    #[validate(range(min = 0.0, message = "Money goal must not be negative"))]
    pub money_goal: Option<f64>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            body: req.body,
            money_goal: req.money_goal,
        }
    }
}

/// Query for `PUT /api/posts/{id}/approve`
#[derive(Debug, Deserialize)]
pub struct ApproveQuery {
    pub approved: bool,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Title search query
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

impl SearchQuery {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn page_size(&self) -> u32 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.page_size())
    }
}

/// One page of results
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, page: u32, size: u32, total_elements: i64) -> Self {
        let size_i64 = i64::from(size.max(1));
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages: (total_elements + size_i64 - 1) / size_i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_wire_format() {
        let post = Post {
            id: 4,
            author_id: 2,
            title: "Books".to_string(),
            body: "School books for 40 kids".to_string(),
            money_goal: None,
            approved: true,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["authorId"], 2);
        assert!(json["moneyGoal"].is_null());
        assert_eq!(json["approved"], true);
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "title": "Wells",
            "body": "Clean water",
            "moneyGoal": 5000.0
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.author_id, None);

        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "title": "",
            "body": "Clean water",
            "moneyGoal": -1.0
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_search_query_defaults_and_clamp() {
        let query: SearchQuery = serde_json::from_value(serde_json::json!({"keyword": "water"})).unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let query = SearchQuery {
            keyword: String::new(),
            page: 3,
            size: 1000,
        };
        assert_eq!(query.page_size(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 300);
    }

    #[test]
    fn test_page_total_pages() {
        assert_eq!(Page::new(vec![1, 2], 0, 2, 5).total_pages, 3);
        assert_eq!(Page::<i32>::new(vec![], 0, 10, 0).total_pages, 0);
        assert_eq!(Page::new(vec![1], 0, 10, 10).total_pages, 1);
    }
}
