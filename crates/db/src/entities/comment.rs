//! Comment entity.
//!
//! Comments attach to a polymorphic subject (poll, opinion, or forum
//! thread) and may reply to another comment on the same subject via
//! `parent_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a comment is attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum SubjectType {
    #[sea_orm(string_value = "poll")]
    Poll,
    #[sea_orm(string_value = "opinion")]
    Opinion,
    #[sea_orm(string_value = "thread")]
    Thread,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub subject_type: SubjectType,

    pub subject_id: String,

    /// Parent comment for replies (null for top-level)
    #[sea_orm(nullable)]
    pub parent_id: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    #[sea_orm(default_value = 0)]
    pub upvote_count: i32,

    #[sea_orm(default_value = 0)]
    pub downvote_count: i32,

    /// Direct replies (denormalized)
    #[sea_orm(default_value = 0)]
    pub reply_count: i32,

    /// Removed by a moderator or the author
    #[sea_orm(default_value = false)]
    pub is_removed: bool,

    /// Optimistic concurrency token, bumped on every update
    #[sea_orm(default_value = 1)]
    pub version: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,

    #[sea_orm(has_many = "super::comment_reaction::Entity")]
    Reactions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment_reaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
