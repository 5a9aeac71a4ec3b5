// src/application/commands/news/service.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::targets::TargetingService,
        dto::ActorContext,
        error::ApplicationResult,
        permissions::PermissionEvaluator,
        ports::{
            activity::{ActivityFeed, NewActivity},
            events::EventBus,
            notify::{NotificationGateway, NotificationKind, NotificationRequest},
            search::{NEWS_SEARCH_TYPE, SearchIndex},
            social::SpaceDirectory,
            time::Clock,
        },
        queries::news::NewsQueryService,
        services::deletion::PendingDeletions,
    },
    domain::news::{
        ActivityRef, Audience, DraftId, DraftKind, DraftProperties, NewNote, News, NewsId,
        NoteStore, NoteVersion, PageProperties, PropertyKey, PropertyStore, PublicationState,
        SpaceId, UserId, VersionProperties,
    },
};
use crate::application::error::ApplicationError;
use chrono::{DateTime, Utc};

/// Owns the article state machine: draft↔article promotion, scheduling,
/// publish/unpublish, translation versions, sharing, view tracking, and
/// deletion. Every operation anchors on the page property bag; read-model
/// refresh (index, notifications, permissions) runs after that commit and
/// never rolls it back.
pub struct NewsCommandService {
    pub(super) notes: Arc<dyn NoteStore>,
    pub(super) properties: Arc<dyn PropertyStore>,
    pub(super) spaces: Arc<dyn SpaceDirectory>,
    pub(super) activities: Arc<dyn ActivityFeed>,
    pub(super) search: Arc<dyn SearchIndex>,
    pub(super) bus: Arc<dyn EventBus>,
    pub(super) notifications: Arc<dyn NotificationGateway>,
    pub(super) permissions: Arc<PermissionEvaluator>,
    pub(super) targeting: Arc<TargetingService>,
    pub(super) reader: Arc<NewsQueryService>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) pending_deletions: PendingDeletions<NewsId>,
}

impl NewsCommandService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        notes: Arc<dyn NoteStore>,
        properties: Arc<dyn PropertyStore>,
        spaces: Arc<dyn SpaceDirectory>,
        activities: Arc<dyn ActivityFeed>,
        search: Arc<dyn SearchIndex>,
        bus: Arc<dyn EventBus>,
        notifications: Arc<dyn NotificationGateway>,
        permissions: Arc<PermissionEvaluator>,
        targeting: Arc<TargetingService>,
        reader: Arc<NewsQueryService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notes,
            properties,
            spaces,
            activities,
            search,
            bus,
            notifications,
            permissions,
            targeting,
            reader,
            clock,
            pending_deletions: PendingDeletions::new(),
        }
    }

    /// Post the primary activity for a freshly promoted article. The append
    /// to the activities list happens here and nowhere else; an article that
    /// already carries activities is left untouched so a replayed promotion
    /// cannot produce a duplicate.
    pub(super) async fn post_primary_activity(
        &self,
        id: NewsId,
        space_id: SpaceId,
        author: &UserId,
        title: &str,
    ) -> ApplicationResult<()> {
        let key = PropertyKey::page(id);
        let Some(item) = self.properties.get_item(&key).await? else {
            return Ok(());
        };
        let mut page = PageProperties::from_map(&item.properties);
        if page.primary_activity().is_some() {
            tracing::debug!(news_id = %id, "primary activity already posted, skipping");
            return Ok(());
        }
        let activity = self
            .activities
            .create_activity(NewActivity {
                space_id,
                poster: author.clone(),
                title: title.to_owned(),
                hidden: !page.activity_posted,
                news_id: Some(id),
            })
            .await?;
        page.append_activity(ActivityRef {
            space_id,
            activity_id: activity.id,
        });
        self.properties
            .update_item(&key, page.to_map(), author)
            .await?;
        Ok(())
    }

    /// Recompute which spaces may read the note. Non-fatal: the page bag is
    /// already committed when this runs.
    pub(super) async fn resync_read_permissions(
        &self,
        id: NewsId,
        space_id: SpaceId,
        page: &PageProperties,
    ) {
        let mut spaces = vec![space_id];
        spaces.extend(page.shared_space_ids());
        if let Err(err) = self.notes.set_read_spaces(id, &spaces).await {
            tracing::warn!(news_id = %id, error = %err, "read-permission resync failed");
        }
    }

    pub(super) async fn trigger_reindex(&self, index_ref: &str) {
        if let Err(err) = self.search.reindex(NEWS_SEARCH_TYPE, index_ref).await {
            tracing::warn!(index_ref, error = %err, "reindex trigger failed");
        }
    }

    pub(super) async fn trigger_unindex(&self, index_ref: &str) {
        if let Err(err) = self.search.unindex(NEWS_SEARCH_TYPE, index_ref).await {
            tracing::warn!(index_ref, error = %err, "unindex trigger failed");
        }
    }

    /// Materialize a new-page draft as an article: note + published version +
    /// version marker + page bag, then consume the draft. Shared by posting
    /// and scheduling; capability checks stay with the callers.
    #[allow(clippy::too_many_arguments)]
    pub(super) async fn create_article_from_draft(
        &self,
        actor: &ActorContext,
        draft_id: DraftId,
        state: PublicationState,
        published: bool,
        audience: Option<Audience>,
        schedule_post_date: Option<DateTime<Utc>>,
        activity_posted: Option<bool>,
    ) -> ApplicationResult<NewsId> {
        let draft = self
            .notes
            .get_draft(draft_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("draft {draft_id} not found")))?;
        let DraftKind::NewPage { space_id } = draft.kind else {
            return Err(ApplicationError::validation(
                "only a new-page draft can become a new article",
            ));
        };

        self.notes.resolve_space_root(space_id).await?;
        let note = self
            .notes
            .create_note(NewNote {
                space_id,
                author: draft.author.clone(),
                title: draft.title.clone(),
                body: draft.body.clone(),
            })
            .await?;
        let version = self.notes.create_version(note.id, &actor.user, None).await?;

        let draft_key = PropertyKey::draft(draft_id, space_id);
        let draft_properties = self
            .properties
            .get_item(&draft_key)
            .await?
            .map(|item| DraftProperties::from_map(&item.properties))
            .unwrap_or_default();
        self.upsert_version_marker(&version, draft_properties.summary.clone())
            .await?;

        let page = PageProperties {
            publication_state: state,
            published,
            audience,
            schedule_post_date,
            activity_posted: activity_posted.unwrap_or(draft_properties.activity_posted),
            ..PageProperties::default()
        };
        self.properties
            .create_item(PropertyKey::page(note.id), page.to_map(), &actor.user)
            .await?;

        self.notes.delete_draft(draft_id).await?;
        self.properties.delete_item(&draft_key).await?;
        Ok(note.id)
    }

    /// Create or refresh the marker bag attached to a published version.
    pub(super) async fn upsert_version_marker(
        &self,
        version: &NoteVersion,
        summary: Option<String>,
    ) -> ApplicationResult<()> {
        let key = PropertyKey::page_version(version.id);
        let marker = VersionProperties {
            lang: version.lang.clone(),
            summary,
            draft: false,
            updated_date: Some(self.clock.now()),
        };
        if self.properties.get_item(&key).await?.is_some() {
            self.properties
                .update_item(&key, marker.to_map(), &version.author)
                .await?;
        } else {
            self.properties
                .create_item(key, marker.to_map(), &version.author)
                .await?;
        }
        Ok(())
    }

    /// Best-effort dispatch: notification failures are logged, never
    /// propagated.
    pub(super) async fn dispatch_notification(
        &self,
        news: &News,
        actor: &UserId,
        kind: NotificationKind,
    ) {
        let request = NotificationRequest {
            news_id: news.id,
            space_id: news.space_id,
            author: news.author.clone(),
            actor: actor.clone(),
            title: news.title.as_str().to_owned(),
            kind,
        };
        if let Err(err) = self.notifications.notify(request).await {
            tracing::warn!(news_id = %news.id, error = %err, "notification dispatch failed");
        }
    }
}
