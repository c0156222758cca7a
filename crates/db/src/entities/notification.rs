//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification types.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "camelCase")]
pub enum NotificationKind {
    /// Someone voted on your poll
    #[sea_orm(string_value = "pollVote")]
    PollVote,
    /// Your poll expired or was closed
    #[sea_orm(string_value = "pollClosed")]
    PollClosed,
    /// Someone commented on your poll, opinion, or thread
    #[sea_orm(string_value = "comment")]
    Comment,
    /// Someone replied to your comment
    #[sea_orm(string_value = "reply")]
    Reply,
    /// Someone reacted to your opinion or comment
    #[sea_orm(string_value = "reaction")]
    Reaction,
    /// Someone joined a group you administer
    #[sea_orm(string_value = "groupJoin")]
    GroupJoin,
    /// A moderator acted on your content
    #[sea_orm(string_value = "moderation")]
    Moderation,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user receiving the notification
    pub recipient_id: String,

    /// The user who triggered it (none for system notifications)
    #[sea_orm(nullable)]
    pub actor_id: Option<String>,

    pub kind: NotificationKind,

    /// Related poll ID
    #[sea_orm(nullable)]
    pub poll_id: Option<String>,

    /// Related opinion ID
    #[sea_orm(nullable)]
    pub opinion_id: Option<String>,

    /// Related comment ID
    #[sea_orm(nullable)]
    pub comment_id: Option<String>,

    /// Related group ID
    #[sea_orm(nullable)]
    pub group_id: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RecipientId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ActorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Actor,
}

impl ActiveModelBehavior for ActiveModel {}
