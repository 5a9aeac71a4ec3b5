// src/application/commands/news/post.rs
use super::{NewsCommandService, mentions};
use crate::{
    application::{
        dto::{ActorContext, NewsDto},
        error::{ApplicationError, ApplicationResult},
        ports::{events::EventBus, notify::NotificationKind},
    },
    domain::news::{
        Audience, DraftId, DraftKind, NewsEvent, NewsId, NoteStore, PageProperties, PropertyKey,
        PropertyStore, PublicationState, TargetName,
    },
};

pub struct PostNewsCommand {
    /// Id of the draft being promoted, or of an already staged/posted
    /// article.
    pub id: i64,
    pub published: bool,
    pub audience: Option<String>,
    pub targets: Vec<String>,
    /// Overrides the activity visibility recorded on the draft.
    pub activity_posted: Option<bool>,
}

impl NewsCommandService {
    /// Promote content to a posted article. Three mutually exclusive paths,
    /// selected from the authoritative page bag: an already-posted article
    /// gets a fresh content version; a staged article is flipped to posted
    /// and its schedule cleared; anything else is a new-page draft that
    /// becomes a brand-new article.
    pub async fn post_news(
        &self,
        actor: &ActorContext,
        command: PostNewsCommand,
    ) -> ApplicationResult<NewsDto> {
        let audience = command
            .audience
            .as_deref()
            .map(str::parse::<Audience>)
            .transpose()?;
        let targets = command
            .targets
            .iter()
            .map(|name| TargetName::new(name.clone()))
            .collect::<Result<Vec<_>, _>>()?;

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
            if !self.permissions.can_create(note.space_id, &actor.user).await? {
                return Err(ApplicationError::forbidden(format!(
                    "user {} may not post news in space {}",
                    actor.user, note.space_id
                )));
            }
            let mut page = PageProperties::from_map(&item.properties);
            if page.publication_state == PublicationState::Posted {
                // Already posted: commit the current content as a version.
                let version = self
                    .notes
                    .create_version(id, &actor.user, note.lang.as_ref())
                    .await?;
                self.upsert_version_marker(&version, None).await?;
            } else {
                // Staged (or carrying a schedule): flip and clear. Replays
                // find the state already posted and take the branch above.
                page.promote_scheduled();
                page.publication_state = PublicationState::Posted;
                if let Some(flag) = command.activity_posted {
                    page.activity_posted = flag;
                }
                self.properties
                    .update_item(&item.key, page.to_map(), &actor.user)
                    .await?;
            }
            id
        } else {
            self.promote_new_page_draft(actor, &command, audience).await?
        };

        // Common tail, in order: primary activity (exactly once), post
        // notification, publish when requested, domain events.
        let news = self.reader.article_snapshot(news_id, None, true).await?;
        self.post_primary_activity(news_id, news.space_id, &news.author, news.title.as_str())
            .await?;
        self.dispatch_notification(&news, &actor.user, NotificationKind::Post)
            .await;
        let mentioned = mentions::extract_mentions(news.body.as_str());
        if !mentioned.is_empty() {
            self.dispatch_notification(&news, &actor.user, NotificationKind::Mention { mentioned })
                .await;
        }
        if command.published || news.published {
            let target_list = (!targets.is_empty()).then_some(targets.as_slice());
            self.apply_publish(actor, &news, audience, target_list)
                .await?;
        }
        self.bus.broadcast(&NewsEvent::ArticlePosted {
            id: news_id,
            space_id: news.space_id,
        });
        self.bus.broadcast(&NewsEvent::NewsPosted {
            id: news_id,
            author: news.author.clone(),
        });
        tracing::info!(news_id = %news_id, space_id = %news.space_id, "news article posted");

        let news = self.reader.article_snapshot(news_id, None, true).await?;
        Ok(news.into())
    }

    /// Path (c): materialize a new-page draft as a posted article.
    async fn promote_new_page_draft(
        &self,
        actor: &ActorContext,
        command: &PostNewsCommand,
        audience: Option<Audience>,
    ) -> ApplicationResult<NewsId> {
        let draft_id = DraftId::new(command.id)?;
        let draft = self
            .notes
            .get_draft(draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("draft {draft_id} not found")))?;
        if let DraftKind::NewPage { space_id } = draft.kind {
            if !self.permissions.can_create(space_id, &actor.user).await? {
                return Err(ApplicationError::forbidden(format!(
                    "user {} may not post news in space {space_id}",
                    actor.user
                )));
            }
        }
        self.create_article_from_draft(
            actor,
            draft_id,
            PublicationState::Posted,
            command.published,
            audience,
            None,
            command.activity_posted,
        )
        .await
    }
}
