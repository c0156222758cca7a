//! Group service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voxpop_common::{AppError, AppResult, IdGenerator};
use voxpop_db::{
    entities::{
        group, group_member, group_member::GroupRole, notification,
        notification::NotificationKind,
    },
    repositories::{GroupMemberRepository, GroupRepository, NotificationRepository},
};

/// Group service for business logic.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
    member_repo: GroupMemberRepository,
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

/// Input for creating a group.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    #[validate(length(min = 3, max = 100, message = "Name must be 3-100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid URL"))]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub is_private: bool,
}

/// Input for updating a group.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupInput {
    #[validate(length(min = 3, max = 100, message = "Name must be 3-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid URL"))]
    pub avatar_url: Option<String>,

    pub is_private: Option<bool>,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub const fn new(
        group_repo: GroupRepository,
        member_repo: GroupMemberRepository,
        notification_repo: NotificationRepository,
    ) -> Self {
        Self {
            group_repo,
            member_repo,
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a group. The creator becomes its admin member.
    pub async fn create_group(
        &self,
        user_id: &str,
        input: CreateGroupInput,
    ) -> AppResult<group::Model> {
        input.validate()?;

        let model = group::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(input.name),
            description: Set(input.description),
            avatar_url: Set(input.avatar_url),
            is_private: Set(input.is_private),
            member_count: Set(1),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let group = self.group_repo.create(model).await?;

        let member = group_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group.id.clone()),
            user_id: Set(user_id.to_string()),
            role: Set(GroupRole::Admin),
            created_at: Set(Utc::now().into()),
        };
        self.member_repo.create(member).await?;

        tracing::info!(group_id = %group.id, user_id = %user_id, "Created group");
        Ok(group)
    }

    /// Get a group by ID.
    pub async fn get_group(&self, group_id: &str) -> AppResult<group::Model> {
        self.group_repo.get_by_id(group_id).await
    }

    /// List public groups.
    pub async fn list_groups(&self, limit: u64, offset: u64) -> AppResult<Vec<group::Model>> {
        self.group_repo.list(limit.min(100), offset).await
    }

    /// Update a group. Requires the group admin role.
    pub async fn update_group(
        &self,
        user_id: &str,
        group_id: &str,
        input: UpdateGroupInput,
    ) -> AppResult<group::Model> {
        input.validate()?;
        self.require_role(group_id, user_id, GroupRole::Admin).await?;

        let group = self.group_repo.get_by_id(group_id).await?;
        let mut active: group::ActiveModel = group.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        if let Some(is_private) = input.is_private {
            active.is_private = Set(is_private);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.group_repo.update(active).await
    }

    /// Delete a group. Requires the group admin role or moderator rights.
    pub async fn delete_group(
        &self,
        user_id: &str,
        can_moderate: bool,
        group_id: &str,
    ) -> AppResult<()> {
        if !can_moderate {
            self.require_role(group_id, user_id, GroupRole::Admin).await?;
        }
        self.group_repo.delete(group_id).await
    }

    /// Join a group as a regular member.
    pub async fn join(&self, user_id: &str, group_id: &str) -> AppResult<group_member::Model> {
        let group = self.group_repo.get_by_id(group_id).await?;

        if self.member_repo.find_member(group_id, user_id).await?.is_some() {
            return Err(AppError::Conflict(
                "You are already a member of this group".to_string(),
            ));
        }

        let model = group_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            group_id: Set(group_id.to_string()),
            user_id: Set(user_id.to_string()),
            role: Set(GroupRole::Member),
            created_at: Set(Utc::now().into()),
        };
        let member = self.member_repo.create(model).await?;
        self.group_repo.adjust_member_count(group_id, 1).await?;

        if group.user_id != user_id {
            let model = notification::ActiveModel {
                id: Set(self.id_gen.generate()),
                recipient_id: Set(group.user_id),
                actor_id: Set(Some(user_id.to_string())),
                kind: Set(NotificationKind::GroupJoin),
                group_id: Set(Some(group_id.to_string())),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            };
            self.notification_repo.create(model).await?;
        }

        Ok(member)
    }

    /// Leave a group. The last admin cannot leave.
    pub async fn leave(&self, user_id: &str, group_id: &str) -> AppResult<()> {
        let member = self
            .member_repo
            .find_member(group_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("You are not a member of this group".to_string())
            })?;

        if member.role == GroupRole::Admin
            && self.member_repo.count_admins(group_id).await? <= 1
        {
            return Err(AppError::BadRequest(
                "The last admin cannot leave the group".to_string(),
            ));
        }

        self.member_repo.delete(&member.id).await?;
        self.group_repo.adjust_member_count(group_id, -1).await?;
        Ok(())
    }

    /// Members of a group, admins and moderators first.
    pub async fn list_members(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<group_member::Model>> {
        // 404s when the group does not exist
        self.group_repo.get_by_id(group_id).await?;
        self.member_repo
            .find_by_group(group_id, limit.min(100), offset)
            .await
    }

    /// Groups a user belongs to.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<group::Model>> {
        let memberships = self.member_repo.find_by_user(user_id).await?;
        let mut groups = Vec::with_capacity(memberships.len());
        for membership in memberships {
            if let Some(group) = self.group_repo.find_by_id(&membership.group_id).await? {
                groups.push(group);
            }
        }
        Ok(groups)
    }

    /// Change a member's role. Requires the group admin role. Demoting
    /// the last admin is rejected.
    pub async fn set_member_role(
        &self,
        acting_user_id: &str,
        group_id: &str,
        target_user_id: &str,
        role: GroupRole,
    ) -> AppResult<()> {
        self.require_role(group_id, acting_user_id, GroupRole::Admin)
            .await?;

        let target = self
            .member_repo
            .find_member(group_id, target_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Not a member of this group".to_string()))?;

        if target.role == GroupRole::Admin
            && role != GroupRole::Admin
            && self.member_repo.count_admins(group_id).await? <= 1
        {
            return Err(AppError::BadRequest(
                "The last admin cannot be demoted".to_string(),
            ));
        }

        self.member_repo.update_role(&target.id, role).await
    }

    /// Check whether a user belongs to a group.
    pub async fn is_member(&self, group_id: &str, user_id: &str) -> AppResult<bool> {
        Ok(self.member_repo.find_member(group_id, user_id).await?.is_some())
    }

    async fn require_role(
        &self,
        group_id: &str,
        user_id: &str,
        minimum: GroupRole,
    ) -> AppResult<group_member::Model> {
        let member = self
            .member_repo
            .find_member(group_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You are not a member of this group".to_string())
            })?;

        if member.role < minimum {
            return Err(AppError::Forbidden(
                "Insufficient group role".to_string(),
            ));
        }
        Ok(member)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_group_role_ordering() {
        assert!(GroupRole::Member < GroupRole::Moderator);
        assert!(GroupRole::Moderator < GroupRole::Admin);
    }

    #[test]
    fn test_group_name_validation() {
        let short = CreateGroupInput {
            name: "ab".to_string(),
            description: None,
            avatar_url: None,
            is_private: false,
        };
        assert!(short.validate().is_err());
    }
}
