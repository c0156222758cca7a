//! Poll entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "poll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(nullable)]
    pub category: Option<String>,

    /// Tags (JSON array of strings, max 5)
    #[sea_orm(column_type = "Json")]
    pub tags: JsonValue,

    /// Whether a voter may pick more than one option
    #[sea_orm(default_value = false)]
    pub allow_multiple_votes: bool,

    #[sea_orm(default_value = true)]
    pub allow_comments: bool,

    /// Private polls are only visible to members of the owning group
    #[sea_orm(default_value = false)]
    pub is_private: bool,

    #[sea_orm(default_value = false)]
    pub show_results_before_voting: bool,

    #[sea_orm(default_value = false)]
    pub is_closed: bool,

    #[sea_orm(default_value = false)]
    pub is_featured: bool,

    /// When voting closes (null for no expiration)
    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeWithTimeZone>,

    /// Owning group, if posted into one
    #[sea_orm(nullable)]
    pub group_id: Option<String>,

    /// Total votes cast (denormalized)
    #[sea_orm(default_value = 0)]
    pub vote_count: i32,

    /// Comments attached (denormalized)
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

    #[sea_orm(has_many = "super::poll_option::Entity")]
    Options,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::poll_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
