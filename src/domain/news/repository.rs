use crate::domain::errors::DomainResult;
use crate::domain::news::note::{DraftPage, NewDraft, NewNote, Note, NoteVersion};
use crate::domain::news::value_objects::{
    DraftId, Language, NewsBody, NewsId, NewsTitle, SpaceId, TargetName, UserId, VersionId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub type PropertyMap = BTreeMap<String, String>;

/// Closed set of object kinds a property bag can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyObjectType {
    /// Article-level workflow state, keyed by note id.
    Page,
    /// Per-language version marker, keyed by version id.
    PageVersion,
    /// New-page draft, keyed by draft id.
    Draft,
    /// Draft of an existing article, keyed by draft id with the note as parent.
    LatestDraft,
    /// Named target definition, keyed by target name.
    Target,
    /// Assignment of an article to a target, keyed by note id with the target
    /// name as parent.
    TargetAssignment,
}

impl PropertyObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::PageVersion => "pageVersion",
            Self::Draft => "draft",
            Self::LatestDraft => "latestDraft",
            Self::Target => "target",
            Self::TargetAssignment => "targetAssignment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    pub object_type: PropertyObjectType,
    pub object_id: String,
    pub parent_id: Option<String>,
    pub space_id: Option<SpaceId>,
}

impl PropertyKey {
    pub fn page(id: NewsId) -> Self {
        Self {
            object_type: PropertyObjectType::Page,
            object_id: id.to_string(),
            parent_id: None,
            space_id: None,
        }
    }

    pub fn page_version(id: VersionId) -> Self {
        Self {
            object_type: PropertyObjectType::PageVersion,
            object_id: id.to_string(),
            parent_id: None,
            space_id: None,
        }
    }

    pub fn draft(id: DraftId, space_id: SpaceId) -> Self {
        Self {
            object_type: PropertyObjectType::Draft,
            object_id: id.to_string(),
            parent_id: None,
            space_id: Some(space_id),
        }
    }

    pub fn latest_draft(id: DraftId, target: NewsId) -> Self {
        Self {
            object_type: PropertyObjectType::LatestDraft,
            object_id: id.to_string(),
            parent_id: Some(target.to_string()),
            space_id: None,
        }
    }

    pub fn target(name: &TargetName) -> Self {
        Self {
            object_type: PropertyObjectType::Target,
            object_id: name.as_str().to_owned(),
            parent_id: None,
            space_id: None,
        }
    }

    pub fn target_assignment(id: NewsId, target: &TargetName, space_id: SpaceId) -> Self {
        Self {
            object_type: PropertyObjectType::TargetAssignment,
            object_id: id.to_string(),
            parent_id: Some(target.as_str().to_owned()),
            space_id: Some(space_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyItem {
    pub key: PropertyKey,
    pub properties: PropertyMap,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generic attached-properties store: one bag per key. The engine's only
/// persistent side-channel for workflow metadata.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Fails with `Conflict` when an item already exists under the key.
    async fn create_item(
        &self,
        key: PropertyKey,
        properties: PropertyMap,
        creator: &UserId,
    ) -> DomainResult<PropertyItem>;

    async fn get_item(&self, key: &PropertyKey) -> DomainResult<Option<PropertyItem>>;

    /// Fails with `NotFound` when no item exists under the key.
    async fn update_item(
        &self,
        key: &PropertyKey,
        properties: PropertyMap,
        updater: &UserId,
    ) -> DomainResult<PropertyItem>;

    async fn delete_item(&self, key: &PropertyKey) -> DomainResult<()>;

    /// Deletes every item of `object_type` attached to `object_id`, whatever
    /// the parent. Returns the number of deleted items.
    async fn delete_items_for_object(
        &self,
        object_type: PropertyObjectType,
        object_id: &str,
    ) -> DomainResult<u64>;

    async fn find_items_for_object(
        &self,
        object_type: PropertyObjectType,
        object_id: &str,
    ) -> DomainResult<Vec<PropertyItem>>;

    async fn find_items_for_parent(
        &self,
        object_type: PropertyObjectType,
        parent_id: &str,
    ) -> DomainResult<Vec<PropertyItem>>;

    async fn find_items_by_property(
        &self,
        object_type: PropertyObjectType,
        name: &str,
        value: &str,
    ) -> DomainResult<Vec<PropertyItem>>;

    async fn list_items(&self, object_type: PropertyObjectType) -> DomainResult<Vec<PropertyItem>>;
}

/// Versioned-document store: note create/update/version/draft primitives,
/// one published version per (note, language).
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Resolve the container note of a space, creating it when absent.
    async fn resolve_space_root(&self, space_id: SpaceId) -> DomainResult<i64>;

    async fn create_note(&self, note: NewNote) -> DomainResult<Note>;

    async fn get_note(&self, id: NewsId) -> DomainResult<Option<Note>>;

    async fn update_note_content(
        &self,
        id: NewsId,
        title: NewsTitle,
        body: NewsBody,
    ) -> DomainResult<Note>;

    async fn set_note_lang(&self, id: NewsId, lang: Option<Language>) -> DomainResult<Note>;

    async fn delete_note(&self, id: NewsId) -> DomainResult<()>;

    /// Snapshot the note's current content as the published version for its
    /// language.
    async fn create_version(
        &self,
        id: NewsId,
        author: &UserId,
        lang: Option<&Language>,
    ) -> DomainResult<NoteVersion>;

    async fn published_version(
        &self,
        id: NewsId,
        lang: Option<&Language>,
    ) -> DomainResult<Option<NoteVersion>>;

    async fn translation_languages(&self, id: NewsId) -> DomainResult<Vec<Language>>;

    async fn create_draft(&self, draft: NewDraft) -> DomainResult<DraftPage>;

    async fn update_draft(
        &self,
        id: DraftId,
        title: NewsTitle,
        body: NewsBody,
    ) -> DomainResult<DraftPage>;

    async fn get_draft(&self, id: DraftId) -> DomainResult<Option<DraftPage>>;

    /// The one draft of `target` owned by `author` for `lang`, if any.
    async fn latest_draft(
        &self,
        target: NewsId,
        author: &UserId,
        lang: Option<&Language>,
    ) -> DomainResult<Option<DraftPage>>;

    async fn drafts_of_note(&self, target: NewsId) -> DomainResult<Vec<DraftPage>>;

    async fn delete_draft(&self, id: DraftId) -> DomainResult<()>;

    /// Recompute which spaces may read the note: the posting space plus every
    /// space the article was shared into.
    async fn set_read_spaces(&self, id: NewsId, spaces: &[SpaceId]) -> DomainResult<()>;
}
