//! Shared reaction kind for opinion and comment reactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The two reaction values. Opinions call them like/dislike, comments
/// upvote/downvote; the storage and transition rules are identical.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "camelCase")]
pub enum ReactionKind {
    #[sea_orm(string_value = "like")]
    #[serde(alias = "up")]
    Like,
    #[sea_orm(string_value = "dislike")]
    #[serde(alias = "down")]
    Dislike,
}
