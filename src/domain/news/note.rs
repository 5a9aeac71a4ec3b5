// src/domain/news/note.rs
//
// Models exchanged with the versioned-document store. The article id is the
// id of its underlying note.
use crate::domain::news::value_objects::{
    DraftId, Language, NewsBody, NewsId, NewsTitle, SpaceId, UserId, VersionId,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Note {
    pub id: NewsId,
    pub space_id: SpaceId,
    pub author: UserId,
    pub title: NewsTitle,
    pub body: NewsBody,
    pub lang: Option<Language>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub space_id: SpaceId,
    pub author: UserId,
    pub title: NewsTitle,
    pub body: NewsBody,
}

#[derive(Debug, Clone)]
pub struct NoteVersion {
    pub id: VersionId,
    pub note_id: NewsId,
    pub lang: Option<Language>,
    pub title: NewsTitle,
    pub body: NewsBody,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A draft is either the seed of a brand-new article or a pending edit of an
/// existing one, scoped by (target note, author, language).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftKind {
    NewPage { space_id: SpaceId },
    ForNote { target: NewsId },
}

#[derive(Debug, Clone)]
pub struct DraftPage {
    pub id: DraftId,
    pub kind: DraftKind,
    pub author: UserId,
    pub lang: Option<Language>,
    pub title: NewsTitle,
    pub body: NewsBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DraftPage {
    pub fn target(&self) -> Option<NewsId> {
        match self.kind {
            DraftKind::ForNote { target } => Some(target),
            DraftKind::NewPage { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDraft {
    pub kind: DraftKind,
    pub author: UserId,
    pub lang: Option<Language>,
    pub title: NewsTitle,
    pub body: NewsBody,
}
