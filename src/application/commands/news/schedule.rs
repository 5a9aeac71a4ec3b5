// src/application/commands/news/schedule.rs
use super::NewsCommandService;
use super::post::PostNewsCommand;
use crate::{
    application::{
        dto::{ActorContext, NewsDto},
        error::{ApplicationError, ApplicationResult},
        ports::{events::EventBus, time::Clock},
    },
    domain::news::{
        Audience, DraftId, NewsEvent, NewsId, NoteStore, PageProperties, PropertyKey,
        PropertyObjectType, PropertyStore, PublicationState,
    },
};
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use std::time::Duration;

pub struct ScheduleNewsCommand {
    /// Id of the draft being staged, or of an existing article.
    pub id: i64,
    /// Caller-local posting time; normalized to UTC on write.
    pub schedule_post_date: DateTime<FixedOffset>,
    pub published: bool,
    pub audience: Option<String>,
}

impl NewsCommandService {
    /// Stage an article for a future posting date. No activity is posted and
    /// nothing is published yet; the `published` flag is only synced for
    /// callers who hold the publish capability.
    pub async fn schedule_news(
        &self,
        actor: &ActorContext,
        command: ScheduleNewsCommand,
    ) -> ApplicationResult<NewsDto> {
        let audience = command
            .audience
            .as_deref()
            .map(str::parse::<Audience>)
            .transpose()?;
        let scheduled_at = command.schedule_post_date.with_timezone(&Utc);

        let existing = match NewsId::new(command.id) {
            Ok(id) => self
                .properties
                .get_item(&PropertyKey::page(id))
                .await?
                .map(|item| (id, item)),
            Err(_) => None,
        };

        let news_id = if let Some((id, item)) = existing {
            let note = self
                .notes
                .get_note(id)
                .await?
                .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
            self.ensure_can_schedule(actor, note.space_id).await?;
            let can_publish = self
                .permissions
                .can_publish(note.space_id, &actor.user)
                .await?;

            let mut page = PageProperties::from_map(&item.properties);
            page.publication_state = PublicationState::Staged;
            page.schedule_post_date = Some(scheduled_at);
            if can_publish {
                page.published = command.published;
                if audience.is_some() {
                    page.audience = audience;
                }
            }
            self.properties
                .update_item(&item.key, page.to_map(), &actor.user)
                .await?;
            id
        } else {
            let draft_id = DraftId::new(command.id)?;
            let draft = self
                .notes
                .get_draft(draft_id)
                .await?
                .ok_or_else(|| ApplicationError::not_found(format!("draft {draft_id} not found")))?;
            let space_id = match draft.kind {
                crate::domain::news::DraftKind::NewPage { space_id } => space_id,
                crate::domain::news::DraftKind::ForNote { .. } => {
                    return Err(ApplicationError::validation(
                        "only a new-page draft can be scheduled",
                    ));
                }
            };
            self.ensure_can_schedule(actor, space_id).await?;
            let can_publish = self.permissions.can_publish(space_id, &actor.user).await?;

            self.create_article_from_draft(
                actor,
                draft_id,
                PublicationState::Staged,
                can_publish && command.published,
                if can_publish { audience } else { None },
                Some(scheduled_at),
                None,
            )
            .await?
        };

        self.bus.broadcast(&NewsEvent::Scheduled { id: news_id });
        tracing::info!(news_id = %news_id, scheduled_at = %scheduled_at, "news staged");
        let news = self.reader.article_snapshot(news_id, None, true).await?;
        Ok(news.into())
    }

    /// Promote every staged article whose schedule date has passed. Each
    /// promotion runs under the article author's identity; failures are
    /// logged per article and do not stop the scan.
    pub async fn post_due_articles(&self) -> ApplicationResult<u64> {
        let now = self.clock.now();
        let staged = self
            .properties
            .find_items_by_property(PropertyObjectType::Page, "publicationState", "staged")
            .await?;
        let mut posted = 0;
        for item in staged {
            let page = PageProperties::from_map(&item.properties);
            if page.deleted {
                continue;
            }
            let Some(due) = page.schedule_post_date else {
                continue;
            };
            if due > now {
                continue;
            }
            let Ok(raw) = item.key.object_id.parse::<i64>() else {
                continue;
            };
            let id = NewsId::new(raw)?;
            let Some(note) = self.notes.get_note(id).await? else {
                continue;
            };
            let author = ActorContext::from_user(note.author.clone());
            let command = PostNewsCommand {
                id: raw,
                published: page.published,
                audience: page.audience.map(|a| a.as_str().to_owned()),
                targets: Vec::new(),
                activity_posted: None,
            };
            match self.post_news(&author, command).await {
                Ok(_) => posted += 1,
                Err(err) => {
                    tracing::error!(news_id = %id, error = %err, "posting scheduled article failed");
                }
            }
        }
        Ok(posted)
    }

    async fn ensure_can_schedule(
        &self,
        actor: &ActorContext,
        space_id: crate::domain::news::SpaceId,
    ) -> ApplicationResult<()> {
        if self
            .permissions
            .can_schedule(space_id, &actor.user)
            .await?
        {
            Ok(())
        } else {
            Err(ApplicationError::forbidden(format!(
                "user {} may not schedule news in space {space_id}",
                actor.user
            )))
        }
    }
}

/// Background loop driving scheduled promotion: scans on a fixed interval
/// until the returned handle is aborted.
pub fn spawn_scheduler(
    service: Arc<NewsCommandService>,
    poll_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = service.post_due_articles().await {
                tracing::error!(error = %err, "scheduled posting scan failed");
            }
        }
    })
}
