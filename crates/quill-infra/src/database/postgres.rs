//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{AuthorStats, PageRequest, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn map_err(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) if at_pos > 1 => format!("{}***{}", &email[..1], &email[at_pos..]),
        Some(at_pos) => format!("***{}", &email[at_pos..]),
        None => "***".to_string(),
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .one(&self.db)
            .await
            .map_err(map_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, entity: User) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(entity)
            .insert(&self.db)
            .await
            .map_err(map_err)?;

        Ok(model.into())
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn author_query(author_id: Uuid, published: Option<bool>) -> sea_orm::Select<PostEntity> {
        let mut query = PostEntity::find().filter(post::Column::AuthorId.eq(author_id));
        if let Some(published) = published {
            query = query.filter(post::Column::Published.eq(published));
        }
        query
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(entity)
            .insert(&self.db)
            .await
            .map_err(map_err)?;

        Ok(model.into())
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(entity)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => RepoError::NotFound,
                other => map_err(other),
            })?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn list_published(&self, page: PageRequest) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page)
            .all(&self.db)
            .await
            .map_err(map_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_published(&self) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .count(&self.db)
            .await
            .map_err(map_err)
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        published: Option<bool>,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError> {
        let result = Self::author_query(author_id, published)
            .order_by_desc(post::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page)
            .all(&self.db)
            .await
            .map_err(map_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_author(
        &self,
        author_id: Uuid,
        published: Option<bool>,
    ) -> Result<u64, RepoError> {
        Self::author_query(author_id, published)
            .count(&self.db)
            .await
            .map_err(map_err)
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
