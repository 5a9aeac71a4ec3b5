use super::NewsCommandService;
use super::mentions;
use super::translation::AddTranslationCommand;
use crate::{
    application::{
        dto::{ActorContext, DraftDto, NewsDocument, NewsDto},
        error::{ApplicationError, ApplicationResult},
        ports::{activity::ActivityFeed, events::EventBus, notify::NotificationKind},
    },
    domain::news::{
        Audience, DraftId, DraftKind, DraftProperties, Language, NewDraft, NewsBody, NewsEvent,
        NewsId, NewsTitle, NoteStore, PageProperties, PropertyKey, PropertyStore,
        PublicationState, TargetName,
    },
};
use chrono::{DateTime, FixedOffset, Utc};

/// What an article update is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    ContentAndTitle,
    Schedule,
    PostingAndPublishing,
}

pub struct UpdateDraftCommand {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
}

pub struct SaveLatestDraftCommand {
    pub article_id: i64,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub lang: Option<String>,
    pub activity_posted: bool,
}

pub struct UpdateArticleCommand {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub kind: UpdateKind,
    pub publish: bool,
    /// When set, refresh the primary activity; `true` also bumps it back to
    /// the top of the stream.
    pub post: Option<bool>,
    pub audience: Option<String>,
    /// Replacement target list; `None` keeps the current assignments.
    pub targets: Option<Vec<String>>,
    /// Target language: a content update carrying a language adds a
    /// translation version instead of touching the canonical document.
    pub lang: Option<String>,
    pub activity_posted: Option<bool>,
    pub schedule_post_date: Option<DateTime<FixedOffset>>,
}

/// One variant per object kind an update can address.
pub enum UpdateNews {
    Draft(UpdateDraftCommand),
    LatestDraft(SaveLatestDraftCommand),
    Article(UpdateArticleCommand),
}

impl NewsCommandService {
    pub async fn update_news(
        &self,
        actor: &ActorContext,
        command: UpdateNews,
    ) -> ApplicationResult<NewsDocument> {
        match command {
            UpdateNews::Draft(command) => self
                .update_new_page_draft(actor, command)
                .await
                .map(NewsDocument::Draft),
            UpdateNews::LatestDraft(command) => self
                .save_latest_draft(actor, command)
                .await
                .map(NewsDocument::Draft),
            UpdateNews::Article(command) => self
                .update_article(actor, command)
                .await
                .map(NewsDocument::Article),
        }
    }

    /// Update a new-page draft in place.
    async fn update_new_page_draft(
        &self,
        actor: &ActorContext,
        command: UpdateDraftCommand,
    ) -> ApplicationResult<DraftDto> {
        let id = DraftId::new(command.id)?;
        let draft = self
            .notes
            .get_draft(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("draft {id} not found")))?;
        let DraftKind::NewPage { space_id } = draft.kind else {
            return Err(ApplicationError::validation(
                "draft does not belong to a new page",
            ));
        };
        if !self.permissions.can_edit(space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not edit news in space {space_id}",
                actor.user
            )));
        }

        let title = NewsTitle::new(command.title)?;
        let body = NewsBody::new(command.body)?;
        let draft = self.notes.update_draft(id, title, body).await?;

        let key = PropertyKey::draft(id, space_id);
        let mut properties = self
            .properties
            .get_item(&key)
            .await?
            .map(|item| DraftProperties::from_map(&item.properties))
            .unwrap_or_default();
        if command.summary.is_some() {
            properties.summary = command.summary;
        }
        self.properties
            .update_item(&key, properties.to_map(), &actor.user)
            .await?;
        Ok(DraftDto::from_parts(&draft, properties))
    }

    /// Create or update the one draft of an existing article scoped by
    /// (article, author, language). A second save for the same triple always
    /// lands on the existing draft.
    async fn save_latest_draft(
        &self,
        actor: &ActorContext,
        command: SaveLatestDraftCommand,
    ) -> ApplicationResult<DraftDto> {
        let target = NewsId::new(command.article_id)?;
        let note = self
            .notes
            .get_note(target)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {target} not found")))?;
        if !self.permissions.can_edit(note.space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not edit news in space {}",
                actor.user, note.space_id
            )));
        }

        let lang = command
            .lang
            .as_deref()
            .map(Language::new)
            .transpose()?;
        let title = NewsTitle::new(command.title)?;
        let body = NewsBody::new(command.body)?;
        let properties = DraftProperties {
            summary: command.summary,
            activity_posted: command.activity_posted,
        };

        let existing = self
            .notes
            .latest_draft(target, &actor.user, lang.as_ref())
            .await?;
        let draft = match existing {
            Some(draft) => {
                let draft = self.notes.update_draft(draft.id, title, body).await?;
                self.properties
                    .update_item(
                        &PropertyKey::latest_draft(draft.id, target),
                        properties.to_map(),
                        &actor.user,
                    )
                    .await?;
                draft
            }
            None => {
                let draft = self
                    .notes
                    .create_draft(NewDraft {
                        kind: DraftKind::ForNote { target },
                        author: actor.user.clone(),
                        lang,
                        title,
                        body,
                    })
                    .await?;
                self.properties
                    .create_item(
                        PropertyKey::latest_draft(draft.id, target),
                        properties.to_map(),
                        &actor.user,
                    )
                    .await?;
                draft
            }
        };
        Ok(DraftDto::from_parts(&draft, properties))
    }

    /// Article update. Side effects run in a fixed order: content commit,
    /// target resolution, publish/audience resolution, notifications,
    /// reindex, broadcast.
    async fn update_article(
        &self,
        actor: &ActorContext,
        command: UpdateArticleCommand,
    ) -> ApplicationResult<NewsDto> {
        let id = NewsId::new(command.id)?;
        let original = self.reader.article_snapshot(id, None, true).await?;
        if !self
            .permissions
            .can_edit(original.space_id, &actor.user)
            .await?
        {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not edit news in space {}",
                actor.user, original.space_id
            )));
        }

        // A content update aimed at a language is a translation, not an edit
        // of the canonical document.
        if command.kind == UpdateKind::ContentAndTitle {
            if let Some(lang) = command.lang.as_deref().filter(|lang| !lang.is_empty()) {
                return self
                    .add_translation_version(
                        actor,
                        AddTranslationCommand {
                            id: command.id,
                            lang: lang.to_owned(),
                            title: command.title,
                            body: command.body,
                            summary: command.summary,
                        },
                    )
                    .await;
            }
        }

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
        let old_targets = self.targeting.targets_for(id).await?;
        let can_publish = self
            .permissions
            .can_publish(original.space_id, &actor.user)
            .await?;

        // 1. Content commit.
        if command.kind == UpdateKind::ContentAndTitle {
            let title = NewsTitle::new(command.title.clone())?;
            let body = NewsBody::new(command.body.clone())?;
            self.notes.update_note_content(id, title, body).await?;
            let version = self.notes.create_version(id, &actor.user, None).await?;
            self.upsert_version_marker(&version, command.summary.clone())
                .await?;
            // The draft that fed this edit is now stale.
            if let Some(stale) = self.notes.latest_draft(id, &actor.user, None).await? {
                self.notes.delete_draft(stale.id).await?;
                self.properties
                    .delete_item(&PropertyKey::latest_draft(stale.id, id))
                    .await?;
            }
        }

        // Metadata commit on the page bag.
        let key = PropertyKey::page(id);
        let item = self
            .properties
            .get_item(&key)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        let mut page = PageProperties::from_map(&item.properties);
        if audience.is_some() {
            page.audience = audience;
        }
        if command.kind == UpdateKind::Schedule {
            if let Some(date) = command.schedule_post_date {
                page.publication_state = PublicationState::Staged;
                page.schedule_post_date = Some(date.with_timezone(&Utc));
            }
        }
        if let Some(flag) = command.activity_posted {
            page.activity_posted = flag;
        }
        self.properties
            .update_item(&key, page.to_map(), &actor.user)
            .await?;

        // 2. Target resolution while the publish flag is unchanged.
        if command.publish == original.published && original.published && can_publish {
            if let Some(targets) = targets.as_deref() {
                if targets != old_targets.as_slice() {
                    self.targeting.unassign_all(id).await?;
                    let displayed = page.publication_state != PublicationState::Staged;
                    self.targeting
                        .assign(actor, id, original.space_id, targets, displayed)
                        .await?;
                }
            }
        }

        // 3. Publish/audience resolution.
        if command.publish != original.published && can_publish {
            if command.publish {
                self.apply_publish(actor, &original, audience, targets.as_deref())
                    .await?;
            } else {
                self.unpublish_news(actor, command.id).await?;
            }
        } else if original.published
            && can_publish
            && audience == Some(Audience::All)
            && original.audience == Some(Audience::SpaceMembers)
        {
            // Audience widened from the space to everyone: notify, but spare
            // members who were already notified under the space audience.
            self.dispatch_notification(
                &original,
                &actor.user,
                NotificationKind::Publish {
                    audience,
                    exclude_space_members: true,
                },
            )
            .await;
        }

        // 4. Mentions and reindex once the article is posted.
        let refreshed = self.reader.article_snapshot(id, None, true).await?;
        if refreshed.publication_state == PublicationState::Posted {
            let mentioned =
                mentions::new_mentions(original.body.as_str(), refreshed.body.as_str());
            if !mentioned.is_empty() {
                self.dispatch_notification(
                    &refreshed,
                    &actor.user,
                    NotificationKind::Mention { mentioned },
                )
                .await;
            }
            self.trigger_reindex(&id.index_ref(None)).await;
        }

        // 5. Activity refresh and broadcast, except for plain drafts.
        if refreshed.publication_state != PublicationState::Draft {
            if let Some(bump) = command.post {
                if let Some(primary) = refreshed.primary_activity() {
                    self.activities
                        .update_activity(primary.activity_id, !refreshed.activity_posted, bump)
                        .await?;
                }
            }
            self.bus.broadcast(&NewsEvent::Updated { id });
        }
        Ok(refreshed.into())
    }
}
