use crate::domain::news::{DraftPage, DraftProperties, News};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDto {
    pub id: i64,
    pub space_id: i64,
    pub author: String,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub lang: Option<String>,
    pub publication_state: String,
    pub published: bool,
    pub audience: Option<String>,
    pub schedule_post_date: Option<DateTime<Utc>>,
    pub publish_date: Option<DateTime<Utc>>,
    /// `"<spaceId>:<activityId>"` pairs, primary first.
    pub activities: Vec<String>,
    pub targets: Vec<String>,
    pub views_count: u64,
    pub activity_posted: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_publish: bool,
}

impl From<News> for NewsDto {
    fn from(news: News) -> Self {
        Self {
            id: news.id.into(),
            space_id: news.space_id.into(),
            author: news.author.to_string(),
            title: news.title.into(),
            body: news.body.into(),
            summary: news.summary,
            lang: news.lang.map(|l| l.as_str().to_owned()),
            publication_state: news.publication_state.as_str().to_owned(),
            published: news.published,
            audience: news.audience.map(|a| a.as_str().to_owned()),
            schedule_post_date: news.schedule_post_date,
            publish_date: news.publish_date,
            activities: news.activities.iter().map(ToString::to_string).collect(),
            targets: news.targets.iter().map(ToString::to_string).collect(),
            views_count: news.viewers.len() as u64,
            activity_posted: news.activity_posted,
            deleted: news.deleted,
            created_at: news.created_at,
            updated_at: news.updated_at,
            can_edit: false,
            can_delete: false,
            can_publish: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftDto {
    pub id: i64,
    /// Set when the draft edits an existing article.
    pub target_id: Option<i64>,
    pub space_id: Option<i64>,
    pub author: String,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub lang: Option<String>,
    pub activity_posted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DraftDto {
    pub fn from_parts(draft: &DraftPage, properties: DraftProperties) -> Self {
        let (target_id, space_id) = match draft.kind {
            crate::domain::news::DraftKind::NewPage { space_id } => (None, Some(space_id.into())),
            crate::domain::news::DraftKind::ForNote { target } => (Some(target.into()), None),
        };
        Self {
            id: draft.id.into(),
            target_id,
            space_id,
            author: draft.author.to_string(),
            title: draft.title.as_str().to_owned(),
            body: draft.body.as_str().to_owned(),
            summary: properties.summary,
            lang: draft.lang.as_ref().map(|l| l.as_str().to_owned()),
            activity_posted: properties.activity_posted,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        }
    }
}

/// What a create/update call produced: a draft that still lives in the
/// document store only, or a full article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NewsDocument {
    Draft(DraftDto),
    Article(NewsDto),
}

impl NewsDocument {
    pub fn as_article(&self) -> Option<&NewsDto> {
        match self {
            Self::Article(dto) => Some(dto),
            Self::Draft(_) => None,
        }
    }

    pub fn as_draft(&self) -> Option<&DraftDto> {
        match self {
            Self::Draft(dto) => Some(dto),
            Self::Article(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn news_document_is_tagged_by_kind() {
        let dto = DraftDto {
            id: 4,
            target_id: None,
            space_id: Some(1),
            author: "ines".into(),
            title: "t".into(),
            body: "b".into(),
            summary: None,
            lang: None,
            activity_posted: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(NewsDocument::Draft(dto)).unwrap();
        assert_eq!(value["kind"], "draft");
        assert_eq!(value["id"], 4);
    }
}
