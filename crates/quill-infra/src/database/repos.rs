//! Typed repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, PostRepository, UserRepository};

use super::base::{SeaOrmRepository, map_db_err};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// SeaORM user repository.
pub type SeaOrmUserRepository = SeaOrmRepository<UserEntity>;

/// SeaORM post repository.
pub type SeaOrmPostRepository = SeaOrmRepository<PostEntity>;

/// SeaORM comment repository.
pub type SeaOrmCommentRepository = SeaOrmRepository<CommentEntity>;

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        UserEntity::find().count(&self.db).await.map_err(map_db_err)
    }
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        // Listing order is part of the page contract: newest first.
        let result = PostEntity::find()
            .order_by_desc(post::Column::PublishedOn)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for SeaOrmCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
