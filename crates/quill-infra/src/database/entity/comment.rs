//! Comment entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub commenter_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CommenterId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Commenter,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commenter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to domain Comment.
impl From<Model> for quill_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            commenter_id: model.commenter_id,
            body: model.body,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from domain Comment to SeaORM ActiveModel.
impl From<quill_core::domain::Comment> for ActiveModel {
    fn from(comment: quill_core::domain::Comment) -> Self {
        Self {
            id: Set(comment.id),
            post_id: Set(comment.post_id),
            commenter_id: Set(comment.commenter_id),
            body: Set(comment.body),
            created_at: Set(comment.created_at.into()),
        }
    }
}
