// src/application/commands/news/share.rs
use super::NewsCommandService;
use crate::{
    application::{
        dto::ActorContext,
        error::{ApplicationError, ApplicationResult},
        ports::events::EventBus,
    },
    domain::news::{
        ActivityId, ActivityRef, NewsEvent, NewsId, PageProperties, PropertyKey, PropertyStore,
        SpaceId,
    },
};

pub struct ShareNewsCommand {
    pub id: i64,
    /// Space the article is shared into.
    pub space_id: i64,
    /// Activity created by the social layer for the shared copy.
    pub activity_id: i64,
}

impl NewsCommandService {
    /// Record a share of the article into another space. The activities list
    /// only ever grows; the primary entry stays first.
    pub async fn share_news(
        &self,
        actor: &ActorContext,
        command: ShareNewsCommand,
    ) -> ApplicationResult<()> {
        let id = NewsId::new(command.id)?;
        let target_space = SpaceId::new(command.space_id)?;
        let news = self.reader.article_snapshot(id, None, true).await?;
        if !self.permissions.can_view(&news, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not share news {id}",
                actor.user
            )));
        }

        let key = PropertyKey::page(id);
        let item = self
            .properties
            .get_item(&key)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        let mut page = PageProperties::from_map(&item.properties);
        page.append_activity(ActivityRef {
            space_id: target_space,
            activity_id: ActivityId(command.activity_id),
        });
        self.properties
            .update_item(&key, page.to_map(), &actor.user)
            .await?;

        self.resync_read_permissions(id, news.space_id, &page).await;
        self.bus.broadcast(&NewsEvent::Shared {
            id,
            space_id: target_space,
        });
        tracing::info!(news_id = %id, space_id = %target_space, "news shared");
        Ok(())
    }
}
