// src/infrastructure/memory/notes.rs
use crate::application::ports::time::Clock;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::news::{
    DraftId, DraftKind, DraftPage, Language, NewDraft, NewNote, NewsBody, NewsId, NewsTitle, Note,
    NoteStore, NoteVersion, SpaceId, UserId, VersionId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct NoteRecord {
    note: Note,
    versions: Vec<NoteVersion>,
    read_spaces: Vec<SpaceId>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    roots: HashMap<SpaceId, i64>,
    notes: HashMap<i64, NoteRecord>,
    drafts: HashMap<i64, DraftPage>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn record_mut(&mut self, id: NewsId) -> DomainResult<&mut NoteRecord> {
        self.notes
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound(format!("note {id} not found")))
    }
}

/// Embedded document store. Ids are minted from one counter, so note and
/// draft ids never collide.
pub struct InMemoryNoteStore {
    clock: Arc<dyn Clock>,
    state: Mutex<State>,
}

impl InMemoryNoteStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(State::default()),
        }
    }

    /// Test hook: spaces currently allowed to read the note.
    pub fn read_spaces(&self, id: NewsId) -> Vec<SpaceId> {
        let state = self.state.lock().expect("note store poisoned");
        state
            .notes
            .get(&i64::from(id))
            .map(|record| record.read_spaces.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn resolve_space_root(&self, space_id: SpaceId) -> DomainResult<i64> {
        let mut state = self.state.lock().expect("note store poisoned");
        if let Some(root) = state.roots.get(&space_id) {
            return Ok(*root);
        }
        let root = state.next_id();
        state.roots.insert(space_id, root);
        Ok(root)
    }

    async fn create_note(&self, note: NewNote) -> DomainResult<Note> {
        let mut state = self.state.lock().expect("note store poisoned");
        let now = self.clock.now();
        let id = state.next_id();
        let note = Note {
            id: NewsId::new(id)?,
            space_id: note.space_id,
            author: note.author,
            title: note.title,
            body: note.body,
            lang: None,
            deleted: false,
            created_at: now,
            updated_at: now,
        };
        state.notes.insert(
            id,
            NoteRecord {
                note: note.clone(),
                versions: Vec::new(),
                read_spaces: vec![note.space_id],
            },
        );
        Ok(note)
    }

    async fn get_note(&self, id: NewsId) -> DomainResult<Option<Note>> {
        let state = self.state.lock().expect("note store poisoned");
        Ok(state
            .notes
            .get(&i64::from(id))
            .map(|record| record.note.clone()))
    }

    async fn update_note_content(
        &self,
        id: NewsId,
        title: NewsTitle,
        body: NewsBody,
    ) -> DomainResult<Note> {
        let now = self.clock.now();
        let mut state = self.state.lock().expect("note store poisoned");
        let record = state.record_mut(id)?;
        record.note.title = title;
        record.note.body = body;
        record.note.updated_at = now;
        Ok(record.note.clone())
    }

    async fn set_note_lang(&self, id: NewsId, lang: Option<Language>) -> DomainResult<Note> {
        let now = self.clock.now();
        let mut state = self.state.lock().expect("note store poisoned");
        let record = state.record_mut(id)?;
        record.note.lang = lang;
        record.note.updated_at = now;
        Ok(record.note.clone())
    }

    async fn delete_note(&self, id: NewsId) -> DomainResult<()> {
        let mut state = self.state.lock().expect("note store poisoned");
        let record = state.record_mut(id)?;
        record.note.deleted = true;
        Ok(())
    }

    async fn create_version(
        &self,
        id: NewsId,
        author: &UserId,
        lang: Option<&Language>,
    ) -> DomainResult<NoteVersion> {
        let now = self.clock.now();
        let mut state = self.state.lock().expect("note store poisoned");
        let version_id = state.next_id();
        let record = state.record_mut(id)?;
        let version = NoteVersion {
            id: VersionId(version_id),
            note_id: id,
            lang: lang.cloned(),
            title: record.note.title.clone(),
            body: record.note.body.clone(),
            author: author.clone(),
            created_at: now,
            updated_at: now,
        };
        record.versions.push(version.clone());
        Ok(version)
    }

    async fn published_version(
        &self,
        id: NewsId,
        lang: Option<&Language>,
    ) -> DomainResult<Option<NoteVersion>> {
        let state = self.state.lock().expect("note store poisoned");
        let Some(record) = state.notes.get(&i64::from(id)) else {
            return Ok(None);
        };
        Ok(record
            .versions
            .iter()
            .rev()
            .find(|version| version.lang.as_ref() == lang)
            .cloned())
    }

    async fn translation_languages(&self, id: NewsId) -> DomainResult<Vec<Language>> {
        let state = self.state.lock().expect("note store poisoned");
        let Some(record) = state.notes.get(&i64::from(id)) else {
            return Ok(Vec::new());
        };
        let mut languages = Vec::new();
        for version in &record.versions {
            if let Some(lang) = &version.lang {
                if !languages.contains(lang) {
                    languages.push(lang.clone());
                }
            }
        }
        Ok(languages)
    }

    async fn create_draft(&self, draft: NewDraft) -> DomainResult<DraftPage> {
        let now = self.clock.now();
        let mut state = self.state.lock().expect("note store poisoned");
        let id = state.next_id();
        let draft = DraftPage {
            id: DraftId::new(id)?,
            kind: draft.kind,
            author: draft.author,
            lang: draft.lang,
            title: draft.title,
            body: draft.body,
            created_at: now,
            updated_at: now,
        };
        state.drafts.insert(id, draft.clone());
        Ok(draft)
    }

    async fn update_draft(
        &self,
        id: DraftId,
        title: NewsTitle,
        body: NewsBody,
    ) -> DomainResult<DraftPage> {
        let now = self.clock.now();
        let mut state = self.state.lock().expect("note store poisoned");
        let draft = state
            .drafts
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound(format!("draft {id} not found")))?;
        draft.title = title;
        draft.body = body;
        draft.updated_at = now;
        Ok(draft.clone())
    }

    async fn get_draft(&self, id: DraftId) -> DomainResult<Option<DraftPage>> {
        let state = self.state.lock().expect("note store poisoned");
        Ok(state.drafts.get(&i64::from(id)).cloned())
    }

    async fn latest_draft(
        &self,
        target: NewsId,
        author: &UserId,
        lang: Option<&Language>,
    ) -> DomainResult<Option<DraftPage>> {
        let state = self.state.lock().expect("note store poisoned");
        Ok(state
            .drafts
            .values()
            .find(|draft| {
                draft.kind == DraftKind::ForNote { target }
                    && draft.author == *author
                    && draft.lang.as_ref() == lang
            })
            .cloned())
    }

    async fn drafts_of_note(&self, target: NewsId) -> DomainResult<Vec<DraftPage>> {
        let state = self.state.lock().expect("note store poisoned");
        Ok(state
            .drafts
            .values()
            .filter(|draft| draft.kind == DraftKind::ForNote { target })
            .cloned()
            .collect())
    }

    async fn delete_draft(&self, id: DraftId) -> DomainResult<()> {
        let mut state = self.state.lock().expect("note store poisoned");
        state.drafts.remove(&i64::from(id));
        Ok(())
    }

    async fn set_read_spaces(&self, id: NewsId, spaces: &[SpaceId]) -> DomainResult<()> {
        let mut state = self.state.lock().expect("note store poisoned");
        let record = state.record_mut(id)?;
        record.read_spaces = spaces.to_vec();
        Ok(())
    }
}
