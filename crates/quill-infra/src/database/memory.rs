//! In-memory repositories.
//!
//! Used as the test double for handler tests and as the fallback when no
//! database is configured. Mirrors the Postgres repositories' behavior,
//! including unique constraints on email and username.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorStats, PageRequest, PostRepository, UserRepository};

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// In-memory post repository.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest-first slice of the posts matching `filter`.
    async fn page_of(&self, filter: impl Fn(&Post) -> bool, page: PageRequest) -> Vec<Post> {
        let posts = self.posts.read().await;
        let mut matching: Vec<Post> = posts.values().filter(|p| filter(p)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect()
    }

    async fn count_of(&self, filter: impl Fn(&Post) -> bool) -> u64 {
        self.posts.read().await.values().filter(|p| filter(p)).count() as u64
    }
}

fn author_filter(author_id: Uuid, published: Option<bool>) -> impl Fn(&Post) -> bool {
    move |p: &Post| p.author_id == author_id && published.is_none_or(|f| p.published == f)
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if !posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn list_published(&self, page: PageRequest) -> Result<Vec<Post>, RepoError> {
        Ok(self.page_of(|p| p.published, page).await)
    }

    async fn count_published(&self) -> Result<u64, RepoError> {
        Ok(self.count_of(|p| p.published).await)
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        published: Option<bool>,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self.page_of(author_filter(author_id, published), page).await)
    }

    async fn count_by_author(
        &self,
        author_id: Uuid,
        published: Option<bool>,
    ) -> Result<u64, RepoError> {
        Ok(self.count_of(author_filter(author_id, published)).await)
    }

    async fn author_stats(&self, author_id: Uuid) -> Result<AuthorStats, RepoError> {
        let total = self.count_by_author(author_id, None).await?;
        let published = self.count_by_author(author_id, Some(true)).await?;

        Ok(AuthorStats {
            total,
            published,
            drafts: total - published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, username: &str) -> User {
        User::new(email.to_string(), username.to_string(), "hash".to_string())
    }

    fn post(author_id: Uuid, title: &str, published: bool) -> Post {
        Post::new(author_id, title, "some content here", published).unwrap()
    }

    #[tokio::test]
    async fn user_insert_and_lookups() {
        let repo = InMemoryUserRepository::new();
        let saved = repo.insert(user("ada@example.com", "ada")).await.unwrap();

        assert!(repo.find_by_id(saved.id).await.unwrap().is_some());
        assert!(repo.find_by_email("ada@example.com").await.unwrap().is_some());
        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(
            repo.find_by_email_or_username("other@example.com", "ada")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn user_insert_enforces_uniqueness() {
        let repo = InMemoryUserRepository::new();
        repo.insert(user("ada@example.com", "ada")).await.unwrap();

        let dup_email = repo.insert(user("ada@example.com", "other")).await;
        assert!(matches!(dup_email.unwrap_err(), RepoError::Constraint(_)));

        let dup_username = repo.insert(user("other@example.com", "ada")).await;
        assert!(matches!(dup_username.unwrap_err(), RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn published_listing_excludes_drafts() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        repo.insert(post(author, "published one", true)).await.unwrap();
        repo.insert(post(author, "draft one", false)).await.unwrap();

        let page = repo.list_published(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert!(page[0].published);
        assert_eq!(repo.count_published().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let mut older = post(author, "older post", true);
        older.created_at -= chrono::TimeDelta::minutes(5);
        repo.insert(older).await.unwrap();
        repo.insert(post(author, "newer post", true)).await.unwrap();

        let page = repo.list_published(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(page[0].title, "newer post");
        assert_eq!(page[1].title, "older post");
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() {
        let repo = InMemoryPostRepository::new();
        let p = repo.insert(post(Uuid::new_v4(), "title", false)).await.unwrap();

        repo.delete(p.id).await.unwrap();
        assert!(matches!(repo.delete(p.id).await.unwrap_err(), RepoError::NotFound));
    }

    #[tokio::test]
    async fn author_stats_counts_full_set() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let other = Uuid::new_v4();
        repo.insert(post(author, "one", true)).await.unwrap();
        repo.insert(post(author, "two", false)).await.unwrap();
        repo.insert(post(author, "three", false)).await.unwrap();
        repo.insert(post(other, "not mine", true)).await.unwrap();

        let stats = repo.author_stats(author).await.unwrap();
        assert_eq!(
            stats,
            AuthorStats {
                total: 3,
                published: 1,
                drafts: 2
            }
        );
    }
}
