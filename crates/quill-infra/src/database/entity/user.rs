//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::Role;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to domain User.
/// An unrecognized role string degrades to `Reader` rather than failing the row.
impl From<Model> for quill_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            role: Role::parse(&model.role).unwrap_or(Role::Reader),
        }
    }
}

/// Conversion from domain User to SeaORM ActiveModel.
impl From<quill_core::domain::User> for ActiveModel {
    fn from(user: quill_core::domain::User) -> Self {
        Self {
            id: Set(user.id),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            role: Set(user.role.as_str().to_string()),
        }
    }
}
