// src/application/permissions.rs
//
// Derives the capability set of a caller from space roles plus the
// cross-cutting platform publisher membership.
use crate::application::error::ApplicationResult;
use crate::application::ports::social::SpaceDirectory;
use crate::domain::news::{News, PublicationState, SpaceId, UserId};
use std::sync::Arc;

pub struct PermissionEvaluator {
    spaces: Arc<dyn SpaceDirectory>,
}

impl PermissionEvaluator {
    pub fn new(spaces: Arc<dyn SpaceDirectory>) -> Self {
        Self { spaces }
    }

    /// Cross-cutting publish capability: platform publisher, space publisher,
    /// space manager, or super-manager.
    pub async fn can_publish(&self, space: SpaceId, user: &UserId) -> ApplicationResult<bool> {
        Ok(self.spaces.is_platform_publisher(user).await?
            || self.spaces.is_publisher(space, user).await?
            || self.spaces.is_manager(space, user).await?
            || self.spaces.is_super_manager(user).await?)
    }

    pub async fn can_create(&self, space: SpaceId, user: &UserId) -> ApplicationResult<bool> {
        Ok(self.can_publish(space, user).await? || self.spaces.can_redact(space, user).await?)
    }

    pub async fn can_edit(&self, space: SpaceId, user: &UserId) -> ApplicationResult<bool> {
        self.can_create(space, user).await
    }

    /// Deletion is reserved to callers with redaction rights; the publish
    /// capability alone is not enough.
    pub async fn can_delete(&self, space: SpaceId, user: &UserId) -> ApplicationResult<bool> {
        Ok(self.spaces.can_redact(space, user).await?)
    }

    pub async fn can_schedule(&self, space: SpaceId, user: &UserId) -> ApplicationResult<bool> {
        Ok(self.spaces.is_manager(space, user).await?
            || self.spaces.is_redactor(space, user).await?
            || self.can_publish(space, user).await?)
    }

    pub async fn can_manage_targets(&self, user: &UserId) -> ApplicationResult<bool> {
        Ok(self.spaces.is_platform_manager(user).await?)
    }

    pub async fn can_view(&self, news: &News, user: &UserId) -> ApplicationResult<bool> {
        let space = news.space_id;
        // Unposted, unpublished content is only visible from inside.
        if news.publication_state != PublicationState::Posted
            && !news.published
            && !self.is_insider(news, user).await?
        {
            return Ok(false);
        }
        if news.published
            && news.is_posted()
            && news.audience == Some(crate::domain::news::Audience::SpaceMembers)
            && !self.is_insider(news, user).await?
        {
            return Ok(false);
        }
        if news.is_staged() && !self.can_schedule(space, user).await? {
            return Ok(false);
        }
        Ok(true)
    }

    /// Member of the posting space, super-manager, or member of any space the
    /// article was shared into.
    async fn is_insider(&self, news: &News, user: &UserId) -> ApplicationResult<bool> {
        if self.spaces.is_super_manager(user).await?
            || self.spaces.is_member(news.space_id, user).await?
        {
            return Ok(true);
        }
        for space in news.shared_space_ids() {
            if self.spaces.is_member(space, user).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
