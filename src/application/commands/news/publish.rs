// src/application/commands/news/publish.rs
use super::NewsCommandService;
use crate::{
    application::{
        dto::ActorContext,
        error::{ApplicationError, ApplicationResult},
        ports::{events::EventBus, notify::NotificationKind, time::Clock},
    },
    domain::news::{
        Audience, News, NewsEvent, NewsId, PageProperties, PropertyKey, PropertyStore,
        PublicationState, TargetName,
    },
};

pub struct PublishNewsCommand {
    pub id: i64,
    pub audience: Option<String>,
    /// Replacement target list; `None` keeps the current assignments.
    pub targets: Option<Vec<String>>,
}

impl NewsCommandService {
    pub async fn publish_news(
        &self,
        actor: &ActorContext,
        command: PublishNewsCommand,
    ) -> ApplicationResult<()> {
        let id = NewsId::new(command.id)?;
        let audience = command
            .audience
            .as_deref()
            .map(str::parse::<Audience>)
            .transpose()?;
        let targets = command
            .targets
            .map(|targets| {
                targets
                    .into_iter()
                    .map(TargetName::new)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let news = self.reader.article_snapshot(id, None, true).await?;
        if !self.permissions.can_publish(news.space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not publish news in space {}",
                actor.user, news.space_id
            )));
        }
        self.apply_publish(actor, &news, audience, targets.as_deref())
            .await
    }

    /// Publication side effects, in order: page bag commit, target
    /// reassignment, read-permission resync, `Published` broadcast, publish
    /// notification (never fatal).
    pub(super) async fn apply_publish(
        &self,
        actor: &ActorContext,
        news: &News,
        audience: Option<Audience>,
        targets: Option<&[TargetName]>,
    ) -> ApplicationResult<()> {
        let key = PropertyKey::page(news.id);
        let item = self
            .properties
            .get_item(&key)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {} not found", news.id)))?;
        let mut page = PageProperties::from_map(&item.properties);
        page.mark_published(audience, self.clock.now());
        self.properties
            .update_item(&key, page.to_map(), &actor.user)
            .await?;

        if let Some(targets) = targets {
            // Delete-then-recreate keeps the assignment set equal to the
            // requested list.
            self.targeting.unassign_all(news.id).await?;
            let displayed = page.publication_state != PublicationState::Staged;
            self.targeting
                .assign(actor, news.id, news.space_id, targets, displayed)
                .await?;
        }

        self.resync_read_permissions(news.id, news.space_id, &page)
            .await;
        self.bus.broadcast(&NewsEvent::Published { id: news.id });
        self.dispatch_notification(
            news,
            &actor.user,
            NotificationKind::Publish {
                audience: page.audience,
                exclude_space_members: false,
            },
        )
        .await;
        tracing::info!(news_id = %news.id, "news published");
        Ok(())
    }

    /// Inverse of publish: clears the published flag and audience, drops all
    /// target assignments, recomputes read permissions. No notification.
    pub async fn unpublish_news(&self, actor: &ActorContext, id: i64) -> ApplicationResult<()> {
        let id = NewsId::new(id)?;
        let news = self.reader.article_snapshot(id, None, true).await?;
        if !self.permissions.can_publish(news.space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not unpublish news in space {}",
                actor.user, news.space_id
            )));
        }

        self.targeting.unassign_all(id).await?;

        let key = PropertyKey::page(id);
        let item = self
            .properties
            .get_item(&key)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        let mut page = PageProperties::from_map(&item.properties);
        page.mark_unpublished();
        self.properties
            .update_item(&key, page.to_map(), &actor.user)
            .await?;

        self.resync_read_permissions(id, news.space_id, &page).await;
        tracing::info!(news_id = %id, "news unpublished");
        Ok(())
    }
}
