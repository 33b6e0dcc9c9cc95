use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// A page request, 1-indexed.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

/// Aggregate counts over an author's full post set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorStats {
    pub total: u64,
    pub published: u64,
    pub drafts: u64,
}

/// User repository port.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Uniqueness probe for registration: matches on either column.
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, RepoError>;

    /// Persist a new user.
    async fn insert(&self, user: User) -> Result<User, RepoError>;
}

/// Post repository port. Listing queries are newest-first by creation time.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete by id; `RepoError::NotFound` if no row was removed.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// One page of published posts.
    async fn list_published(&self, page: PageRequest) -> Result<Vec<Post>, RepoError>;

    async fn count_published(&self) -> Result<u64, RepoError>;

    /// One page of an author's posts, optionally filtered by published state.
    async fn list_by_author(
        &self,
        author_id: Uuid,
        published: Option<bool>,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError>;

    async fn count_by_author(
        &self,
        author_id: Uuid,
        published: Option<bool>,
    ) -> Result<u64, RepoError>;

    /// Stats over the author's full post set, independent of any filter.
    async fn author_stats(&self, author_id: Uuid) -> Result<AuthorStats, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn page_request_clamps_to_one() {
        let page = PageRequest::new(0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
    }
}
