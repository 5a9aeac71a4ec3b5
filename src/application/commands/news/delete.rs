// src/application/commands/news/delete.rs
use super::NewsCommandService;
use crate::{
    application::{
        dto::ActorContext,
        error::{ApplicationError, ApplicationResult},
        ports::{activity::ActivityFeed, events::EventBus},
    },
    domain::news::{
        DraftKind, NewsEvent, NewsId, NoteStore, PageProperties, PropertyKey, PropertyObjectType,
        PropertyStore,
    },
};
use std::sync::Arc;
use std::time::Duration;

impl NewsCommandService {
    /// Delete an article: outstanding drafts, the document itself, every
    /// primary and shared activity, all target assignments, and every index
    /// entry (base id plus one per translation). The page bag stays behind,
    /// marked deleted.
    pub async fn delete_news(&self, actor: &ActorContext, id: i64) -> ApplicationResult<()> {
        let id = NewsId::new(id)?;
        let note = self
            .notes
            .get_note(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        if !self.permissions.can_delete(note.space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not delete news in space {}",
                actor.user, note.space_id
            )));
        }

        // Translations must be collected before the note disappears.
        let languages = self.notes.translation_languages(id).await?;

        for draft in self.notes.drafts_of_note(id).await? {
            self.notes.delete_draft(draft.id).await?;
            let key = match draft.kind {
                DraftKind::ForNote { target } => PropertyKey::latest_draft(draft.id, target),
                DraftKind::NewPage { space_id } => PropertyKey::draft(draft.id, space_id),
            };
            self.properties.delete_item(&key).await?;
        }

        self.notes.delete_note(id).await?;

        let key = PropertyKey::page(id);
        let item = self
            .properties
            .get_item(&key)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        let mut page = PageProperties::from_map(&item.properties);
        for activity in &page.activities {
            self.activities.delete_activity(activity.activity_id).await?;
        }
        page.deleted = true;
        self.properties
            .update_item(&key, page.to_map(), &actor.user)
            .await?;

        self.properties
            .delete_items_for_object(PropertyObjectType::TargetAssignment, &id.to_string())
            .await?;

        self.trigger_unindex(&id.index_ref(None)).await;
        for lang in &languages {
            self.trigger_unindex(&id.index_ref(Some(lang))).await;
        }

        self.bus.broadcast(&NewsEvent::Deleted { id });
        tracing::info!(news_id = %id, "news deleted");
        Ok(())
    }

    /// Arm a grace-period deletion: the article is deleted after `delay`
    /// unless the same caller undoes it first. A non-positive delay deletes
    /// immediately.
    pub async fn request_delete(
        self: Arc<Self>,
        actor: &ActorContext,
        id: i64,
        delay: Duration,
    ) -> ApplicationResult<()> {
        let news_id = NewsId::new(id)?;
        let note = self
            .notes
            .get_note(news_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {news_id} not found")))?;
        if !self.permissions.can_delete(note.space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not delete news in space {}",
                actor.user, note.space_id
            )));
        }
        if delay.is_zero() {
            return self.delete_news(actor, id).await;
        }

        self.pending_deletions
            .arm(news_id, actor.user.clone())
            .await;
        let service = Arc::clone(&self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // An undo may have raced the timer; only the winner deletes, and
            // the deletion runs under the original requester's identity.
            let Some(requested_by) = service.pending_deletions.take_if_armed(&news_id).await
            else {
                return;
            };
            let requester = ActorContext::from_user(requested_by);
            if let Err(err) = service.delete_news(&requester, id).await {
                tracing::error!(news_id = %news_id, error = %err, "deferred news deletion failed");
            }
        });
        Ok(())
    }

    /// Cancel a pending deletion. Only the caller who requested it may undo;
    /// anyone else gets `Forbidden` and the deletion stays armed.
    pub async fn undo_delete(&self, actor: &ActorContext, id: i64) -> ApplicationResult<()> {
        let news_id = NewsId::new(id)?;
        self.pending_deletions.disarm(&news_id, &actor.user).await
    }
}
