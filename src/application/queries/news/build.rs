// src/application/queries/news/build.rs
//
// Article reconstruction. Every outward-facing read goes through
// `article_snapshot`, so the language fallback rule is applied in exactly
// one place.
use super::NewsQueryService;
use crate::{
    application::{
        dto::DraftDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::news::{
        DraftId, DraftKind, DraftProperties, Language, News, NewsId, NoteStore, PageProperties,
        PropertyKey, PropertyStore, VersionProperties,
    },
};

impl NewsQueryService {
    /// Rebuild the aggregate from the note, the page bag, and the published
    /// version for `lang`. When no version exists for `lang` and fallback is
    /// allowed, the canonical (no-language) version is used; otherwise the
    /// article does not exist for that language.
    pub async fn article_snapshot(
        &self,
        id: NewsId,
        lang: Option<&Language>,
        fallback_allowed: bool,
    ) -> ApplicationResult<News> {
        let note = self
            .notes
            .get_note(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        let item = self
            .properties
            .get_item(&PropertyKey::page(id))
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        let page = PageProperties::from_map(&item.properties);
        if page.deleted || note.deleted {
            return Err(ApplicationError::not_found(format!(
                "article {id} not found"
            )));
        }

        let version = match self.notes.published_version(id, lang).await? {
            Some(version) => version,
            None if lang.is_some() && fallback_allowed => self
                .notes
                .published_version(id, None)
                .await?
                .ok_or_else(|| {
                    ApplicationError::not_found(format!("article {id} has no published version"))
                })?,
            None => {
                return Err(ApplicationError::not_found(match lang {
                    Some(lang) => format!("article {id} has no version for language {lang}"),
                    None => format!("article {id} has no published version"),
                }));
            }
        };

        let version_properties = self
            .properties
            .get_item(&PropertyKey::page_version(version.id))
            .await?
            .map(|item| VersionProperties::from_map(&item.properties))
            .unwrap_or_default();
        let targets = self.targeting.targets_for(id).await?;
        Ok(News::assemble(
            &note,
            &version,
            page,
            version_properties,
            targets,
        ))
    }

    pub(super) async fn draft_snapshot(&self, id: DraftId) -> ApplicationResult<DraftDto> {
        let draft = self
            .notes
            .get_draft(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("draft {id} not found")))?;
        let key = match draft.kind {
            DraftKind::NewPage { space_id } => PropertyKey::draft(id, space_id),
            DraftKind::ForNote { target } => PropertyKey::latest_draft(id, target),
        };
        let properties = self
            .properties
            .get_item(&key)
            .await?
            .map(|item| DraftProperties::from_map(&item.properties))
            .unwrap_or_default();
        Ok(DraftDto::from_parts(&draft, properties))
    }
}
