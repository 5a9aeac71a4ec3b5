// src/application/queries/news/service.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::targets::TargetingService,
        dto::{ActorContext, NewsDto},
        error::ApplicationResult,
        permissions::PermissionEvaluator,
        ports::activity::ActivityFeed,
    },
    domain::news::{News, NoteStore, PropertyStore},
};

pub struct NewsQueryService {
    pub(super) notes: Arc<dyn NoteStore>,
    pub(super) properties: Arc<dyn PropertyStore>,
    pub(super) activities: Arc<dyn ActivityFeed>,
    pub(super) targeting: Arc<TargetingService>,
    pub(super) permissions: Arc<PermissionEvaluator>,
}

impl NewsQueryService {
    pub fn new(
        notes: Arc<dyn NoteStore>,
        properties: Arc<dyn PropertyStore>,
        activities: Arc<dyn ActivityFeed>,
        targeting: Arc<TargetingService>,
        permissions: Arc<PermissionEvaluator>,
    ) -> Self {
        Self {
            notes,
            properties,
            activities,
            targeting,
            permissions,
        }
    }

    /// Resolve the caller's action flags onto an outgoing DTO.
    pub(super) async fn decorate(
        &self,
        actor: &ActorContext,
        news: &News,
        mut dto: NewsDto,
    ) -> ApplicationResult<NewsDto> {
        dto.can_edit = self.permissions.can_edit(news.space_id, &actor.user).await?;
        dto.can_delete = self
            .permissions
            .can_delete(news.space_id, &actor.user)
            .await?;
        dto.can_publish = self
            .permissions
            .can_publish(news.space_id, &actor.user)
            .await?;
        Ok(dto)
    }
}
