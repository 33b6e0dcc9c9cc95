//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use quill_infra::auth::{Argon2PasswordService, JwtTokenService};
use quill_infra::database::DatabaseConfig;
use quill_infra::database::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, PostgresUserRepository, connect};

/// Shared application state: the repositories and auth services every
/// handler depends on. Dependencies are injected here rather than reached
/// for globally, so tests can substitute in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            if let Some(config) = db_config {
                match connect(config).await {
                    Ok(conn) => {
                        use migration::MigratorTrait;
                        if let Err(e) = migration::Migrator::up(&conn, None).await {
                            tracing::error!("Migration failed: {}", e);
                        }
                        (
                            Arc::new(PostgresUserRepository::new(conn.clone())),
                            Arc::new(PostgresPostRepository::new(conn)),
                        )
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        Self::memory_repos()
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::memory_repos()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (users, posts) = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Self::memory_repos()
        };

        tracing::info!("Application state initialized");

        Self {
            users,
            posts,
            tokens: Arc::new(JwtTokenService::from_env()),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    fn memory_repos() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
        (
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }

    /// Fully in-memory state for handler tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        use quill_infra::auth::JwtConfig;

        let (users, posts) = Self::memory_repos();
        Self {
            users,
            posts,
            tokens: Arc::new(JwtTokenService::new(JwtConfig {
                secret: "test-secret".to_string(),
                ..JwtConfig::default()
            })),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}
