//! Opinion entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Opinion visibility status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum OpinionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    /// Hidden by a moderator, restorable
    #[sea_orm(string_value = "hidden")]
    Hidden,
    /// Removed, content no longer served
    #[sea_orm(string_value = "removed")]
    Removed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "opinion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    /// Poll this opinion comments on, if any
    #[sea_orm(nullable)]
    pub poll_id: Option<String>,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub status: OpinionStatus,

    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    #[sea_orm(default_value = 0)]
    pub dislike_count: i32,

    #[sea_orm(default_value = 0)]
    pub comment_count: i32,

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
        belongs_to = "super::poll::Entity",
        from = "Column::PollId",
        to = "super::poll::Column::Id",
        on_delete = "SetNull"
    )]
    Poll,

    #[sea_orm(has_many = "super::opinion_reaction::Entity")]
    Reactions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::opinion_reaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
