// src/application/commands/news/create.rs
use super::NewsCommandService;
use super::post::PostNewsCommand;
use super::schedule::ScheduleNewsCommand;
use crate::{
    application::{
        dto::{ActorContext, DraftDto, NewsDocument},
        error::{ApplicationError, ApplicationResult},
        ports::social::SpaceDirectory,
    },
    domain::news::{
        DraftKind, DraftProperties, NewDraft, NewsBody, NewsTitle, NoteStore, PropertyKey,
        PropertyStore, SpaceId,
    },
};
use chrono::{DateTime, FixedOffset};

pub struct CreateNewsCommand {
    pub space_id: i64,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    /// Post immediately instead of keeping a draft.
    pub post: bool,
    pub published: bool,
    pub audience: Option<String>,
    pub schedule_post_date: Option<DateTime<FixedOffset>>,
    pub targets: Vec<String>,
    pub activity_posted: bool,
}

impl CreateNewsCommand {
    pub fn builder() -> CreateNewsCommandBuilder {
        CreateNewsCommandBuilder::default()
    }
}

#[derive(Default)]
pub struct CreateNewsCommandBuilder {
    space_id: Option<i64>,
    title: Option<String>,
    body: Option<String>,
    summary: Option<String>,
    post: bool,
    published: bool,
    audience: Option<String>,
    schedule_post_date: Option<DateTime<FixedOffset>>,
    targets: Vec<String>,
    activity_posted: bool,
}

impl CreateNewsCommandBuilder {
    pub fn space_id(mut self, space_id: i64) -> Self {
        self.space_id = Some(space_id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn post(mut self, post: bool) -> Self {
        self.post = post;
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn schedule_post_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.schedule_post_date = Some(date);
        self
    }

    pub fn targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }

    pub fn activity_posted(mut self, activity_posted: bool) -> Self {
        self.activity_posted = activity_posted;
        self
    }

    pub fn build(self) -> Result<CreateNewsCommand, &'static str> {
        Ok(CreateNewsCommand {
            space_id: self.space_id.ok_or("space id is required")?,
            title: self.title.ok_or("title is required")?,
            body: self.body.ok_or("body is required")?,
            summary: self.summary,
            post: self.post,
            published: self.published,
            audience: self.audience,
            schedule_post_date: self.schedule_post_date,
            targets: self.targets,
            activity_posted: self.activity_posted,
        })
    }
}

impl NewsCommandService {
    /// Front door for new content. Dispatches on the requested end state:
    /// post immediately, stage for a scheduled date, or keep a draft.
    pub async fn create_news(
        &self,
        actor: &ActorContext,
        command: CreateNewsCommand,
    ) -> ApplicationResult<NewsDocument> {
        let space_id = SpaceId::new(command.space_id)?;
        if self.spaces.space_by_id(space_id).await?.is_none() {
            return Err(ApplicationError::not_found(format!(
                "space {space_id} not found"
            )));
        }
        if !self.permissions.can_create(space_id, &actor.user).await? {
            return Err(ApplicationError::forbidden(format!(
                "user {} may not create news in space {space_id}",
                actor.user
            )));
        }

        let draft = self.create_draft_article(actor, &command, space_id).await?;

        if command.post {
            let posted = self
                .post_news(
                    actor,
                    PostNewsCommand {
                        id: draft.id,
                        published: command.published,
                        audience: command.audience.clone(),
                        targets: command.targets.clone(),
                        activity_posted: Some(command.activity_posted),
                    },
                )
                .await?;
            return Ok(NewsDocument::Article(posted));
        }

        if let Some(schedule) = command.schedule_post_date {
            let staged = self
                .schedule_news(
                    actor,
                    ScheduleNewsCommand {
                        id: draft.id,
                        schedule_post_date: schedule,
                        published: command.published,
                        audience: command.audience.clone(),
                    },
                )
                .await?;
            return Ok(NewsDocument::Article(staged));
        }

        Ok(NewsDocument::Draft(draft))
    }

    /// Create a new-page draft: a note-store draft plus its property bag.
    pub async fn create_draft_article(
        &self,
        actor: &ActorContext,
        command: &CreateNewsCommand,
        space_id: SpaceId,
    ) -> ApplicationResult<DraftDto> {
        let title = NewsTitle::new(command.title.clone())?;
        let body = NewsBody::new(command.body.clone())?;

        // The space container must exist before any draft can be attached.
        self.notes.resolve_space_root(space_id).await?;

        let draft = self
            .notes
            .create_draft(NewDraft {
                kind: DraftKind::NewPage { space_id },
                author: actor.user.clone(),
                lang: None,
                title,
                body,
            })
            .await?;
        let properties = DraftProperties {
            summary: command.summary.clone(),
            activity_posted: command.activity_posted,
        };
        self.properties
            .create_item(
                PropertyKey::draft(draft.id, space_id),
                properties.to_map(),
                &actor.user,
            )
            .await?;
        tracing::info!(draft_id = %draft.id, space_id = %space_id, "news draft created");
        Ok(DraftDto::from_parts(&draft, properties))
    }
}
