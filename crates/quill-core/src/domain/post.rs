use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Title bounds, applied after trimming.
pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 100;
/// Minimum content length after trimming.
pub const CONTENT_MIN_LEN: usize = 10;

/// Post entity - a blog article. `published = false` means draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. Title and content are validated and stored trimmed;
    /// the author is fixed here and never changes.
    pub fn new(
        author_id: Uuid,
        title: &str,
        content: &str,
        published: bool,
    ) -> Result<Self, DomainError> {
        let title = validate_title(title)?;
        let content = validate_content(content)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            published,
            created_at: now,
            updated_at: now,
        })
    }

    /// Ownership predicate used by every mutation path.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Apply a partial update, validating each present field and bumping
    /// `updated_at`. Fails if the change set is empty.
    pub fn apply(&mut self, change: PostChange) -> Result<(), DomainError> {
        if change.is_empty() {
            return Err(DomainError::Validation(
                "At least one of title, content or published is required".to_string(),
            ));
        }
        if let Some(title) = change.title.as_deref() {
            self.title = validate_title(title)?;
        }
        if let Some(content) = change.content.as_deref() {
            self.content = validate_content(content)?;
        }
        if let Some(published) = change.published {
            self.published = published;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Partial update to a post. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChange {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl PostChange {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.published.is_none()
    }
}

/// Trim and bounds-check a title.
pub fn validate_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.chars().count() < TITLE_MIN_LEN {
        return Err(DomainError::Validation(format!(
            "Title must be at least {TITLE_MIN_LEN} characters"
        )));
    }
    if trimmed.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "Title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim and bounds-check post content.
pub fn validate_content(content: &str) -> Result<String, DomainError> {
    let trimmed = content.trim();
    if trimmed.chars().count() < CONTENT_MIN_LEN {
        return Err(DomainError::Validation(format!(
            "Content must be at least {CONTENT_MIN_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post::new(Uuid::new_v4(), "Hello", "World content!", false).unwrap()
    }

    #[test]
    fn new_post_trims_fields() {
        let p = Post::new(Uuid::new_v4(), "  Hello  ", "  World content!  ", false).unwrap();
        assert_eq!(p.title, "Hello");
        assert_eq!(p.content, "World content!");
        assert!(!p.published);
    }

    #[test]
    fn title_length_bounds() {
        assert!(validate_title("ab").is_err());
        assert!(validate_title("abc").is_ok());
        assert!(validate_title(&"x".repeat(101)).is_err());
        assert!(validate_title(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn content_minimum_length() {
        assert!(validate_content("too short").is_err()); // 9 chars
        assert!(validate_content("1234567890").is_ok());
    }

    #[test]
    fn whitespace_does_not_count_toward_length() {
        assert!(validate_title("  ab  ").is_err());
        assert!(validate_content("   123456789   ").is_err());
    }

    #[test]
    fn empty_change_is_rejected() {
        let mut p = post();
        assert!(p.apply(PostChange::default()).is_err());
    }

    #[test]
    fn apply_updates_present_fields_only() {
        let mut p = post();
        let before = p.updated_at;
        p.apply(PostChange {
            published: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert!(p.published);
        assert_eq!(p.title, "Hello");
        assert!(p.updated_at >= before);
    }

    #[test]
    fn apply_validates_changed_fields() {
        let mut p = post();
        let err = p.apply(PostChange {
            title: Some("ab".to_string()),
            ..Default::default()
        });
        assert!(err.is_err());
        assert_eq!(p.title, "Hello");
    }

    #[test]
    fn ownership_predicate() {
        let p = post();
        assert!(p.is_owned_by(p.author_id));
        assert!(!p.is_owned_by(Uuid::new_v4()));
    }
}
