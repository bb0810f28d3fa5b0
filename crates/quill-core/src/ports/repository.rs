use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. A violated uniqueness constraint surfaces as
    /// `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Update an existing entity in place. `RepoError::NotFound` if no row
    /// matches the entity's id.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. `RepoError::NotFound` if no row matched.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Total number of registered users. Zero means the next registration
    /// creates the administrator.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest publication date first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// All comments under a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}
