// src/application/commands/targets/manage.rs
use super::TargetingService;
use crate::{
    application::{
        dto::ActorContext,
        error::{ApplicationError, ApplicationResult},
    },
    domain::news::{PropertyKey, PropertyObjectType, PropertyStore, TargetName, TargetProperties},
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct TargetDefinition {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl TargetingService {
    /// Register a named distribution slot. Creating a second target with the
    /// same name is an explicit conflict, not an idempotent no-op.
    pub async fn create_target(
        &self,
        actor: &ActorContext,
        definition: TargetDefinition,
    ) -> ApplicationResult<()> {
        self.ensure_can_manage(actor).await?;
        let name = TargetName::new(definition.name)?;
        let key = PropertyKey::target(&name);
        if self.properties.get_item(&key).await?.is_some() {
            return Err(ApplicationError::conflict(format!(
                "target {name} already exists"
            )));
        }
        let properties = TargetProperties {
            label: definition.label,
            description: definition.description,
        };
        self.properties
            .create_item(key, properties.to_map(), &actor.user)
            .await?;
        Ok(())
    }

    pub async fn update_target(
        &self,
        actor: &ActorContext,
        original_name: &str,
        definition: TargetDefinition,
    ) -> ApplicationResult<()> {
        self.ensure_can_manage(actor).await?;
        let original = TargetName::new(original_name)?;
        let renamed = TargetName::new(definition.name)?;
        let original_key = PropertyKey::target(&original);
        let stored = self
            .properties
            .get_item(&original_key)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("target {original} not found")))?;

        let next = TargetProperties {
            label: definition.label,
            description: definition.description,
        };
        let same_name = renamed == original;
        if same_name && next.to_map() == stored.properties {
            return Err(ApplicationError::conflict("target update changes nothing"));
        }
        if same_name {
            self.properties
                .update_item(&original_key, next.to_map(), &actor.user)
                .await?;
            return Ok(());
        }

        // Rename: re-key the definition and every assignment pointing at it.
        self.properties
            .create_item(PropertyKey::target(&renamed), next.to_map(), &actor.user)
            .await?;
        let assignments = self
            .properties
            .find_items_for_parent(PropertyObjectType::TargetAssignment, original.as_str())
            .await?;
        for assignment in assignments {
            let mut key = assignment.key.clone();
            key.parent_id = Some(renamed.as_str().to_owned());
            self.properties
                .create_item(key, assignment.properties, &actor.user)
                .await?;
            self.properties.delete_item(&assignment.key).await?;
        }
        self.properties.delete_item(&original_key).await?;
        Ok(())
    }

    pub async fn delete_target(&self, actor: &ActorContext, name: &str) -> ApplicationResult<()> {
        self.ensure_can_manage(actor).await?;
        let name = TargetName::new(name)?;
        self.delete_target_by_name(&name).await
    }

    /// Arm a grace-period deletion of a target; `undo_delete_target` can
    /// cancel it until the timer fires.
    pub async fn request_delete_target(
        self: Arc<Self>,
        actor: &ActorContext,
        name: &str,
        delay: Duration,
    ) -> ApplicationResult<()> {
        self.ensure_can_manage(actor).await?;
        let name = TargetName::new(name)?;
        if self
            .properties
            .get_item(&PropertyKey::target(&name))
            .await?
            .is_none()
        {
            return Err(ApplicationError::not_found(format!(
                "target {name} not found"
            )));
        }
        if delay.is_zero() {
            return self.delete_target_by_name(&name).await;
        }
        self.pending_deletions
            .arm(name.clone(), actor.user.clone())
            .await;
        let service = Arc::clone(&self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if service.pending_deletions.take_if_armed(&name).await.is_some() {
                if let Err(err) = service.delete_target_by_name(&name).await {
                    tracing::error!(target_name = %name, error = %err, "deferred target deletion failed");
                }
            }
        });
        Ok(())
    }

    pub async fn undo_delete_target(
        &self,
        actor: &ActorContext,
        name: &str,
    ) -> ApplicationResult<()> {
        let name = TargetName::new(name)?;
        self.pending_deletions.disarm(&name, &actor.user).await
    }

    pub async fn list_targets(&self) -> ApplicationResult<Vec<TargetDefinition>> {
        let items = self.properties.list_items(PropertyObjectType::Target).await?;
        Ok(items
            .into_iter()
            .map(|item| {
                let properties = TargetProperties::from_map(&item.properties);
                TargetDefinition {
                    name: item.key.object_id,
                    label: properties.label,
                    description: properties.description,
                }
            })
            .collect())
    }

    async fn delete_target_by_name(&self, name: &TargetName) -> ApplicationResult<()> {
        let assignments = self
            .properties
            .find_items_for_parent(PropertyObjectType::TargetAssignment, name.as_str())
            .await?;
        for assignment in assignments {
            self.properties.delete_item(&assignment.key).await?;
        }
        self.properties
            .delete_item(&PropertyKey::target(name))
            .await?;
        Ok(())
    }

    pub(super) async fn ensure_can_manage(&self, actor: &ActorContext) -> ApplicationResult<()> {
        if self.permissions.can_manage_targets(&actor.user).await? {
            Ok(())
        } else {
            Err(ApplicationError::forbidden(format!(
                "user {} may not manage targets",
                actor.user
            )))
        }
    }
}
