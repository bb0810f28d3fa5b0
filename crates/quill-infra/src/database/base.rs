use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};

use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

/// Generic SeaORM repository: one instance per entity, shared pool handle.
pub struct SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Translate driver errors into the store error taxonomy. Unique-index
/// violations become `Constraint` so callers can tell "duplicate" apart from
/// "broken".
pub(crate) fn map_db_err(e: DbErr) -> RepoError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return RepoError::Constraint(e.to_string());
    }

    match e {
        DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for SeaOrmRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync + 'static,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let model = active_model.update(&self.db).await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
