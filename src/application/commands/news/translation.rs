// src/application/commands/news/translation.rs
use super::NewsCommandService;
use crate::{
    application::{
        dto::{ActorContext, NewsDto},
        error::{ApplicationError, ApplicationResult},
        ports::events::EventBus,
    },
    domain::news::{
        Language, NewsBody, NewsEvent, NewsId, NewsTitle, NoteStore, PropertyKey, PropertyStore,
    },
};

pub struct AddTranslationCommand {
    pub id: i64,
    pub lang: String,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
}

impl NewsCommandService {
    /// Record a new language version of an article: the document's language
    /// field moves to the target language, the content is committed as a
    /// published version for it, and the draft that carried the translation
    /// is consumed. The composite id `"<id>-<lang>"` is pushed to the index.
    pub async fn add_translation_version(
        &self,
        actor: &ActorContext,
        command: AddTranslationCommand,
    ) -> ApplicationResult<NewsDto> {
        let id = NewsId::new(command.id)?;
        let lang = Language::new(command.lang)?;
        let note = self
            .notes
            .get_note(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        if !self.permissions.can_edit(note.space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not edit news in space {}",
                actor.user, note.space_id
            )));
        }

        let title = NewsTitle::new(command.title)?;
        let body = NewsBody::new(command.body)?;

        self.notes.set_note_lang(id, Some(lang.clone())).await?;
        self.notes.update_note_content(id, title, body).await?;
        let version = self
            .notes
            .create_version(id, &actor.user, Some(&lang))
            .await?;
        self.upsert_version_marker(&version, command.summary).await?;

        if let Some(stale) = self
            .notes
            .latest_draft(id, &actor.user, Some(&lang))
            .await?
        {
            self.notes.delete_draft(stale.id).await?;
            self.properties
                .delete_item(&PropertyKey::latest_draft(stale.id, id))
                .await?;
        }

        self.trigger_reindex(&id.index_ref(Some(&lang))).await;
        self.bus.broadcast(&NewsEvent::TranslationAdded {
            id,
            lang: lang.clone(),
        });
        tracing::info!(news_id = %id, lang = %lang, "translation version added");

        let news = self.reader.article_snapshot(id, Some(&lang), true).await?;
        Ok(news.into())
    }
}
