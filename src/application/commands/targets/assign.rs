// src/application/commands/targets/assign.rs
use super::TargetingService;
use crate::{
    application::{
        dto::ActorContext,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        errors::DomainError,
        news::{
            AssignmentProperties, NewsId, PropertyKey, PropertyObjectType, PropertyStore, SpaceId,
            TargetName,
        },
    },
};

impl TargetingService {
    /// Assign a published article to the given targets. Assigning a target
    /// the article already carries is swallowed: the end state is the same.
    pub async fn assign(
        &self,
        actor: &ActorContext,
        news_id: NewsId,
        space_id: SpaceId,
        targets: &[TargetName],
        displayed: bool,
    ) -> ApplicationResult<()> {
        if !self.permissions.can_publish(space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not assign targets in space {space_id}",
                actor.user
            )));
        }
        let properties = AssignmentProperties { displayed };
        for target in targets {
            let key = PropertyKey::target_assignment(news_id, target, space_id);
            match self
                .properties
                .create_item(key, properties.to_map(), &actor.user)
                .await
            {
                Ok(_) => {}
                Err(DomainError::Conflict(_)) => {
                    tracing::warn!(news_id = %news_id, target = %target, "target already assigned, ignoring");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Remove every target assignment of the article.
    pub async fn unassign_all(&self, news_id: NewsId) -> ApplicationResult<u64> {
        let removed = self
            .properties
            .delete_items_for_object(PropertyObjectType::TargetAssignment, &news_id.to_string())
            .await?;
        Ok(removed)
    }

    pub async fn unassign_all_checked(
        &self,
        actor: &ActorContext,
        news_id: NewsId,
        space_id: SpaceId,
    ) -> ApplicationResult<u64> {
        if !self.permissions.can_publish(space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not remove targets in space {space_id}",
                actor.user
            )));
        }
        self.unassign_all(news_id).await
    }

    pub async fn targets_for(&self, news_id: NewsId) -> ApplicationResult<Vec<TargetName>> {
        let items = self
            .properties
            .find_items_for_object(PropertyObjectType::TargetAssignment, &news_id.to_string())
            .await?;
        let mut names = Vec::with_capacity(items.len());
        for item in items {
            if let Some(parent) = item.key.parent_id {
                names.push(TargetName::new(parent)?);
            }
        }
        Ok(names)
    }

    /// Articles assigned to a target, optionally restricted to assignments
    /// flagged as displayed.
    pub async fn news_ids_for_target(
        &self,
        target: &TargetName,
        displayed_only: bool,
    ) -> ApplicationResult<Vec<NewsId>> {
        let items = self
            .properties
            .find_items_for_parent(PropertyObjectType::TargetAssignment, target.as_str())
            .await?;
        let mut ids = Vec::new();
        for item in items {
            let assignment = AssignmentProperties::from_map(&item.properties);
            if displayed_only && !assignment.displayed {
                continue;
            }
            if let Ok(raw) = item.key.object_id.parse::<i64>() {
                ids.push(NewsId::new(raw)?);
            }
        }
        Ok(ids)
    }
}
