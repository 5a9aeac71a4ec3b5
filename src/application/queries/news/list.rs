use super::NewsQueryService;
use crate::{
    application::{
        dto::{ActorContext, DraftDto, NewsDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::news::{
        DraftId, NewsId, PageProperties, PropertyObjectType, PropertyStore, TargetName,
    },
};

impl NewsQueryService {
    /// New-page drafts in spaces where the caller may author content.
    pub async fn list_drafts(&self, actor: &ActorContext) -> ApplicationResult<Vec<DraftDto>> {
        let items = self
            .properties
            .list_items(PropertyObjectType::Draft)
            .await?;
        let mut drafts = Vec::new();
        for item in items {
            let Some(space_id) = item.key.space_id else {
                continue;
            };
            if !self.permissions.can_create(space_id, &actor.user).await? {
                continue;
            }
            let Ok(raw) = item.key.object_id.parse::<i64>() else {
                continue;
            };
            match self.draft_snapshot(DraftId::new(raw)?).await {
                Ok(dto) => drafts.push(dto),
                Err(ApplicationError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(drafts)
    }

    /// Staged articles visible to the caller.
    pub async fn list_scheduled(&self, actor: &ActorContext) -> ApplicationResult<Vec<NewsDto>> {
        self.list_by_state(actor, "staged").await
    }

    /// Posted articles visible to the caller.
    pub async fn list_posted(&self, actor: &ActorContext) -> ApplicationResult<Vec<NewsDto>> {
        self.list_by_state(actor, "posted").await
    }

    async fn list_by_state(
        &self,
        actor: &ActorContext,
        state: &str,
    ) -> ApplicationResult<Vec<NewsDto>> {
        let items = self
            .properties
            .find_items_by_property(PropertyObjectType::Page, "publicationState", state)
            .await?;
        let mut result = Vec::new();
        for item in items {
            let page = PageProperties::from_map(&item.properties);
            if page.deleted {
                continue;
            }
            let Ok(raw) = item.key.object_id.parse::<i64>() else {
                continue;
            };
            let news = match self.article_snapshot(NewsId::new(raw)?, None, true).await {
                Ok(news) => news,
                Err(ApplicationError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            };
            if !self.permissions.can_view(&news, &actor.user).await? {
                continue;
            }
            let dto = self.decorate(actor, &news, news.clone().into()).await?;
            result.push(dto);
        }
        Ok(result)
    }

    /// Articles assigned to a target, restricted to displayed assignments and
    /// to what the caller may see.
    pub async fn list_by_target(
        &self,
        actor: &ActorContext,
        target: &str,
    ) -> ApplicationResult<Vec<NewsDto>> {
        let target = TargetName::new(target)?;
        let ids = self.targeting.news_ids_for_target(&target, true).await?;
        let mut result = Vec::new();
        for id in ids {
            let news = match self.article_snapshot(id, None, true).await {
                Ok(news) => news,
                Err(ApplicationError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            };
            if !self.permissions.can_view(&news, &actor.user).await? {
                continue;
            }
            let dto = self.decorate(actor, &news, news.clone().into()).await?;
            result.push(dto);
        }
        Ok(result)
    }
}
