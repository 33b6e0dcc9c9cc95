//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A user's public information. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Response to register/login: the user view plus a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub published: Option<bool>,
}

/// Partial update to a post. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

/// Denormalized author view embedded in post responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// A post with its author attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorResponse,
}

/// Query parameters for paginated post listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Only meaningful on the owner's dashboard listing.
    pub published: Option<bool>,
}

/// Pagination metadata, 1-indexed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_posts: u64,
    pub posts_per_page: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationInfo {
    /// Compute metadata from the true total; valid even for an out-of-range
    /// page, which simply has no next page.
    pub fn new(current_page: u64, posts_per_page: u64, total_posts: u64) -> Self {
        let total_pages = total_posts.div_ceil(posts_per_page.max(1));
        Self {
            current_page,
            total_pages,
            total_posts,
            posts_per_page,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        }
    }
}

/// Public listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub pagination: PaginationInfo,
}

/// Aggregate counts over an author's full post set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostStatsResponse {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
}

/// Owner dashboard listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyPostsResponse {
    pub posts: Vec<PostResponse>,
    pub pagination: PaginationInfo,
    pub stats: PostStatsResponse,
}

/// Plain message body (e.g. after a delete).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_first_page() {
        let p = PaginationInfo::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(!p.has_previous_page);
    }

    #[test]
    fn pagination_last_page() {
        let p = PaginationInfo::new(3, 10, 25);
        assert!(!p.has_next_page);
        assert!(p.has_previous_page);
    }

    #[test]
    fn pagination_out_of_range_page() {
        let p = PaginationInfo::new(4, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next_page);
        assert!(p.has_previous_page);
    }

    #[test]
    fn pagination_empty_set() {
        let p = PaginationInfo::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_previous_page);
    }
}
