// src/domain/news/properties.rs
//
// Typed views over the generic property bags attached to notes, versions,
// drafts and target assignments. The `page` bag is the single source of
// truth for an article's workflow state; everything here encodes/decodes it
// so the rest of the crate never touches raw string maps.
use crate::domain::news::repository::PropertyMap;
use crate::domain::news::value_objects::{
    ActivityRef, Audience, Language, PublicationState, SpaceId, UserId,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

const PUBLICATION_STATE: &str = "publicationState";
const PUBLISHED: &str = "published";
const AUDIENCE: &str = "audience";
const SCHEDULE_POST_DATE: &str = "schedulePostDate";
const PUBLISH_DATE: &str = "publishDate";
const ACTIVITIES: &str = "activities";
const VIEWERS: &str = "viewers";
const VIEWS_COUNT: &str = "viewsCount";
const ACTIVITY_POSTED: &str = "activityPosted";
const DELETED: &str = "deleted";
const SUMMARY: &str = "summary";
const LANG: &str = "lang";
const DRAFT: &str = "draft";
const UPDATED_DATE: &str = "updatedDate";
const DISPLAYED: &str = "displayed";
const LABEL: &str = "label";
const DESCRIPTION: &str = "description";

fn parse_bool(map: &PropertyMap, key: &str) -> bool {
    map.get(key).is_some_and(|v| v == "true")
}

fn parse_date(map: &PropertyMap, key: &str) -> Option<DateTime<Utc>> {
    map.get(key)
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|d| d.with_timezone(&Utc))
}

/// Workflow state attached to the article's note. Reconstructing an article
/// always starts from this bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageProperties {
    pub publication_state: PublicationState,
    pub published: bool,
    pub audience: Option<Audience>,
    pub schedule_post_date: Option<DateTime<Utc>>,
    pub publish_date: Option<DateTime<Utc>>,
    pub activities: Vec<ActivityRef>,
    pub viewers: BTreeSet<UserId>,
    pub activity_posted: bool,
    pub deleted: bool,
}

impl PageProperties {
    /// Decode from a stored map. Malformed entries are skipped rather than
    /// failing the whole read; the bag may have been written by older code.
    pub fn from_map(map: &PropertyMap) -> Self {
        let publication_state = map
            .get(PUBLICATION_STATE)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let audience = map.get(AUDIENCE).and_then(|v| v.parse().ok());
        let activities = map
            .get(ACTIVITIES)
            .map(|raw| {
                raw.split(';')
                    .filter(|part| !part.trim().is_empty())
                    .filter_map(|part| part.trim().parse().ok())
                    .collect()
            })
            .unwrap_or_default();
        let viewers = map
            .get(VIEWERS)
            .map(|raw| {
                raw.split(',')
                    .filter_map(|part| UserId::new(part.trim()).ok())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            publication_state,
            published: parse_bool(map, PUBLISHED),
            audience,
            schedule_post_date: parse_date(map, SCHEDULE_POST_DATE),
            publish_date: parse_date(map, PUBLISH_DATE),
            activities,
            viewers,
            activity_posted: parse_bool(map, ACTIVITY_POSTED),
            deleted: parse_bool(map, DELETED),
        }
    }

    /// Encode for storage. `viewsCount` is re-derived from the viewers set so
    /// the two can never drift apart.
    pub fn to_map(&self) -> PropertyMap {
        let mut map = PropertyMap::new();
        map.insert(
            PUBLICATION_STATE.into(),
            self.publication_state.as_str().into(),
        );
        map.insert(PUBLISHED.into(), self.published.to_string());
        if let Some(audience) = self.audience {
            map.insert(AUDIENCE.into(), audience.as_str().into());
        }
        if let Some(date) = self.schedule_post_date {
            map.insert(SCHEDULE_POST_DATE.into(), date.to_rfc3339());
        }
        if let Some(date) = self.publish_date {
            map.insert(PUBLISH_DATE.into(), date.to_rfc3339());
        }
        if !self.activities.is_empty() {
            let encoded = self
                .activities
                .iter()
                .map(ActivityRef::to_string)
                .collect::<Vec<_>>()
                .join(";");
            map.insert(ACTIVITIES.into(), encoded);
        }
        if !self.viewers.is_empty() {
            let encoded = self
                .viewers
                .iter()
                .map(|v| v.as_str().to_owned())
                .collect::<Vec<_>>()
                .join(",");
            map.insert(VIEWERS.into(), encoded);
            map.insert(VIEWS_COUNT.into(), self.views_count().to_string());
        }
        map.insert(ACTIVITY_POSTED.into(), self.activity_posted.to_string());
        map.insert(DELETED.into(), self.deleted.to_string());
        map
    }

    pub fn views_count(&self) -> u64 {
        self.viewers.len() as u64
    }

    /// Record a view. Returns false when the user already viewed the article,
    /// in which case nothing changed.
    pub fn record_view(&mut self, viewer: &UserId) -> bool {
        self.viewers.insert(viewer.clone())
    }

    pub fn primary_activity(&self) -> Option<ActivityRef> {
        self.activities.first().copied()
    }

    /// Spaces the article was shared into (every activity after the primary).
    pub fn shared_space_ids(&self) -> Vec<SpaceId> {
        let mut seen = BTreeSet::new();
        self.activities
            .iter()
            .skip(1)
            .map(|a| a.space_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn append_activity(&mut self, activity: ActivityRef) {
        self.activities.push(activity);
    }

    pub fn mark_published(&mut self, audience: Option<Audience>, at: DateTime<Utc>) {
        self.published = true;
        self.publish_date = Some(at);
        if audience.is_some() {
            self.audience = audience;
        }
    }

    pub fn mark_unpublished(&mut self) {
        self.published = false;
        self.publish_date = None;
        self.audience = None;
    }

    /// Staged → posted transition, clearing the schedule. Returns false when
    /// there was nothing to promote (already posted, or never staged).
    pub fn promote_scheduled(&mut self) -> bool {
        if self.publication_state == PublicationState::Staged || self.schedule_post_date.is_some() {
            self.publication_state = PublicationState::Posted;
            self.schedule_post_date = None;
            true
        } else {
            false
        }
    }
}

/// Sparse marker attached to one published version of the note (per
/// language).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionProperties {
    pub lang: Option<Language>,
    pub summary: Option<String>,
    pub draft: bool,
    pub updated_date: Option<DateTime<Utc>>,
}

impl VersionProperties {
    pub fn from_map(map: &PropertyMap) -> Self {
        Self {
            lang: map.get(LANG).and_then(|v| Language::new(v).ok()),
            summary: map.get(SUMMARY).cloned(),
            draft: parse_bool(map, DRAFT),
            updated_date: parse_date(map, UPDATED_DATE),
        }
    }

    pub fn to_map(&self) -> PropertyMap {
        let mut map = PropertyMap::new();
        if let Some(lang) = &self.lang {
            map.insert(LANG.into(), lang.as_str().into());
        }
        if let Some(summary) = &self.summary {
            map.insert(SUMMARY.into(), summary.clone());
        }
        if self.draft {
            map.insert(DRAFT.into(), "true".into());
        }
        if let Some(date) = self.updated_date {
            map.insert(UPDATED_DATE.into(), date.to_rfc3339());
        }
        map
    }
}

/// Extra state carried by a draft (new-page or latest-draft) bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftProperties {
    pub summary: Option<String>,
    pub activity_posted: bool,
}

impl DraftProperties {
    pub fn from_map(map: &PropertyMap) -> Self {
        Self {
            summary: map.get(SUMMARY).cloned(),
            activity_posted: parse_bool(map, ACTIVITY_POSTED),
        }
    }

    pub fn to_map(&self) -> PropertyMap {
        let mut map = PropertyMap::new();
        if let Some(summary) = &self.summary {
            map.insert(SUMMARY.into(), summary.clone());
        }
        map.insert(ACTIVITY_POSTED.into(), self.activity_posted.to_string());
        map
    }
}

/// One target assignment of a published article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentProperties {
    pub displayed: bool,
}

impl AssignmentProperties {
    pub fn from_map(map: &PropertyMap) -> Self {
        Self {
            displayed: parse_bool(map, DISPLAYED),
        }
    }

    pub fn to_map(&self) -> PropertyMap {
        let mut map = PropertyMap::new();
        map.insert(DISPLAYED.into(), self.displayed.to_string());
        map
    }
}

/// A named target definition (a distribution slot such as a homepage slider).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetProperties {
    pub label: Option<String>,
    pub description: Option<String>,
}

impl TargetProperties {
    pub fn from_map(map: &PropertyMap) -> Self {
        Self {
            label: map.get(LABEL).cloned(),
            description: map.get(DESCRIPTION).cloned(),
        }
    }

    pub fn to_map(&self) -> PropertyMap {
        let mut map = PropertyMap::new();
        if let Some(label) = &self.label {
            map.insert(LABEL.into(), label.clone());
        }
        if let Some(description) = &self.description {
            map.insert(DESCRIPTION.into(), description.clone());
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::news::value_objects::ActivityId;

    fn viewer(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    #[test]
    fn record_view_is_idempotent_per_user() {
        let mut page = PageProperties::default();
        assert!(page.record_view(&viewer("maia")));
        assert!(!page.record_view(&viewer("maia")));
        assert!(page.record_view(&viewer("noor")));
        assert_eq!(page.views_count(), 2);
    }

    #[test]
    fn views_count_always_matches_viewers() {
        let mut page = PageProperties::default();
        for name in ["a", "b", "c", "a", "b"] {
            page.record_view(&viewer(name));
        }
        let map = page.to_map();
        assert_eq!(map.get("viewsCount").unwrap(), "3");
        let decoded = PageProperties::from_map(&map);
        assert_eq!(decoded.views_count(), 3);
    }

    #[test]
    fn promote_scheduled_clears_schedule_once() {
        let mut page = PageProperties {
            publication_state: PublicationState::Staged,
            schedule_post_date: Some(Utc::now()),
            ..PageProperties::default()
        };
        assert!(page.promote_scheduled());
        assert_eq!(page.publication_state, PublicationState::Posted);
        assert!(page.schedule_post_date.is_none());
        // second promotion finds nothing to do
        assert!(!page.promote_scheduled());
    }

    #[test]
    fn unpublish_clears_audience_and_publish_date() {
        let mut page = PageProperties::default();
        page.mark_published(Some(Audience::SpaceMembers), Utc::now());
        assert!(page.published);
        page.mark_unpublished();
        assert!(!page.published);
        assert!(page.audience.is_none());
        assert!(page.publish_date.is_none());
    }

    #[test]
    fn activities_keep_primary_first_and_skip_garbage() {
        let mut page = PageProperties::default();
        page.append_activity(ActivityRef {
            space_id: SpaceId::new(1).unwrap(),
            activity_id: ActivityId(10),
        });
        page.append_activity(ActivityRef {
            space_id: SpaceId::new(2).unwrap(),
            activity_id: ActivityId(20),
        });
        let mut map = page.to_map();
        let stored = map["activities"].clone();
        map.insert("activities".into(), format!("{stored}; junk"));
        let decoded = PageProperties::from_map(&map);
        assert_eq!(decoded.activities.len(), 2);
        assert_eq!(decoded.primary_activity().unwrap().activity_id, ActivityId(10));
        assert_eq!(
            decoded.shared_space_ids(),
            vec![SpaceId::new(2).unwrap()]
        );
    }
}
