// src/domain/news/entity.rs
use crate::domain::news::note::{Note, NoteVersion};
use crate::domain::news::properties::{PageProperties, VersionProperties};
use crate::domain::news::value_objects::{
    ActivityRef, Audience, Language, NewsBody, NewsId, NewsTitle, PublicationState, SpaceId,
    TargetName, UserId,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// The article aggregate, reconstructed on every read from the note, its
/// published version for the requested language, and the page property bag.
#[derive(Debug, Clone)]
pub struct News {
    pub id: NewsId,
    pub space_id: SpaceId,
    pub author: UserId,
    pub title: NewsTitle,
    pub body: NewsBody,
    pub summary: Option<String>,
    pub lang: Option<Language>,
    pub publication_state: PublicationState,
    pub published: bool,
    pub audience: Option<Audience>,
    pub schedule_post_date: Option<DateTime<Utc>>,
    pub publish_date: Option<DateTime<Utc>>,
    pub activities: Vec<ActivityRef>,
    pub targets: Vec<TargetName>,
    pub viewers: BTreeSet<UserId>,
    pub activity_posted: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl News {
    pub fn assemble(
        note: &Note,
        version: &NoteVersion,
        page: PageProperties,
        version_properties: VersionProperties,
        targets: Vec<TargetName>,
    ) -> Self {
        Self {
            id: note.id,
            space_id: note.space_id,
            author: note.author.clone(),
            title: version.title.clone(),
            body: version.body.clone(),
            summary: version_properties.summary,
            lang: version.lang.clone(),
            publication_state: page.publication_state,
            published: page.published,
            audience: page.audience,
            schedule_post_date: page.schedule_post_date,
            publish_date: page.publish_date,
            activities: page.activities,
            targets,
            viewers: page.viewers,
            activity_posted: page.activity_posted,
            deleted: page.deleted,
            created_at: note.created_at,
            updated_at: version.updated_at,
        }
    }

    pub fn views_count(&self) -> u64 {
        self.viewers.len() as u64
    }

    pub fn primary_activity(&self) -> Option<ActivityRef> {
        self.activities.first().copied()
    }

    pub fn shared_space_ids(&self) -> Vec<SpaceId> {
        let mut seen = BTreeSet::new();
        self.activities
            .iter()
            .skip(1)
            .map(|a| a.space_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn is_staged(&self) -> bool {
        self.publication_state == PublicationState::Staged
    }

    pub fn is_posted(&self) -> bool {
        self.publication_state == PublicationState::Posted
    }

    /// Every space whose members may read the article.
    pub fn read_space_ids(&self) -> Vec<SpaceId> {
        let mut spaces = vec![self.space_id];
        spaces.extend(self.shared_space_ids());
        spaces
    }
}
