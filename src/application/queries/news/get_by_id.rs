use super::NewsQueryService;
use crate::{
    application::{
        dto::{ActorContext, NewsDocument, NewsDto},
        error::{ApplicationError, ApplicationResult},
        ports::activity::ActivityFeed,
    },
    domain::news::{ActivityId, DraftId, DraftKind, Language, NewsId, NoteStore},
};

/// Which representation of an article a read addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsObject {
    Draft,
    LatestDraft,
    Article,
}

pub struct GetNewsQuery {
    pub id: i64,
    pub object: NewsObject,
    pub lang: Option<String>,
    pub edit_mode: bool,
    pub fallback_language: bool,
}

impl NewsQueryService {
    pub async fn get_news_by_id(
        &self,
        actor: &ActorContext,
        query: GetNewsQuery,
    ) -> ApplicationResult<NewsDocument> {
        let lang = query.lang.as_deref().map(Language::new).transpose()?;
        match query.object {
            NewsObject::Article => {
                self.article_document(
                    actor,
                    query.id,
                    lang.as_ref(),
                    query.edit_mode,
                    query.fallback_language,
                )
                .await
            }
            NewsObject::Draft => {
                let id = DraftId::new(query.id)?;
                let draft = self.notes.get_draft(id).await?.ok_or_else(|| {
                    ApplicationError::not_found(format!("draft {id} not found"))
                })?;
                if let DraftKind::NewPage { space_id } = draft.kind {
                    if !self.permissions.can_edit(space_id, &actor.user).await? {
                        return Err(ApplicationError::forbidden(format!(
                            "user {} may not view draft {id}",
                            actor.user
                        )));
                    }
                }
                Ok(NewsDocument::Draft(self.draft_snapshot(id).await?))
            }
            NewsObject::LatestDraft => {
                // The caller's own pending edit when one exists, otherwise
                // the article itself.
                let id = NewsId::new(query.id)?;
                let existing = self
                    .notes
                    .latest_draft(id, &actor.user, lang.as_ref())
                    .await?;
                match existing {
                    Some(draft) => Ok(NewsDocument::Draft(self.draft_snapshot(draft.id).await?)),
                    None => {
                        self.article_document(
                            actor,
                            query.id,
                            lang.as_ref(),
                            query.edit_mode,
                            query.fallback_language,
                        )
                        .await
                    }
                }
            }
        }
    }

    async fn article_document(
        &self,
        actor: &ActorContext,
        id: i64,
        lang: Option<&Language>,
        edit_mode: bool,
        fallback_language: bool,
    ) -> ApplicationResult<NewsDocument> {
        let id = NewsId::new(id)?;
        let news = self.article_snapshot(id, lang, fallback_language).await?;
        if edit_mode {
            if !self.permissions.can_edit(news.space_id, &actor.user).await? {
                return Err(ApplicationError::forbidden(format!(
                    "user {} may not edit news {id}",
                    actor.user
                )));
            }
        } else if !self.permissions.can_view(&news, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not view news {id}",
                actor.user
            )));
        }
        let dto = self
            .decorate(actor, &news, NewsDto::from(news.clone()))
            .await?;
        Ok(NewsDocument::Article(dto))
    }

    /// Convenience wrapper for the common article read.
    pub async fn get_article(
        &self,
        actor: &ActorContext,
        id: i64,
        lang: Option<String>,
        fallback_language: bool,
    ) -> ApplicationResult<NewsDto> {
        let document = self
            .get_news_by_id(
                actor,
                GetNewsQuery {
                    id,
                    object: NewsObject::Article,
                    lang,
                    edit_mode: false,
                    fallback_language,
                },
            )
            .await?;
        match document {
            NewsDocument::Article(dto) => Ok(dto),
            NewsDocument::Draft(_) => Err(ApplicationError::not_found(format!(
                "article {id} not found"
            ))),
        }
    }

    /// Resolve the article behind an activity, following shared copies back
    /// to the original.
    pub async fn news_for_activity(
        &self,
        actor: &ActorContext,
        activity_id: i64,
    ) -> ApplicationResult<NewsDto> {
        let mut current = ActivityId(activity_id);
        for _ in 0..8 {
            let activity = self
                .activities
                .get_activity(current)
                .await?
                .ok_or_else(|| {
                    ApplicationError::not_found(format!("activity {current} not found"))
                })?;
            if let Some(news_id) = activity.news_id {
                return self.get_article(actor, news_id.into(), None, true).await;
            }
            match activity.shared_from {
                Some(origin) => current = origin,
                None => break,
            }
        }
        Err(ApplicationError::not_found(format!(
            "activity {activity_id} does not reference a news article"
        )))
    }
}
