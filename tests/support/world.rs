// tests/support/world.rs
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

use kawara_core::application::dto::{ActorContext, NewsDocument, NewsDto};
use kawara_core::application::ports::time::Clock;
use kawara_core::application::commands::news::CreateNewsCommand;
use kawara_core::application::services::ApplicationServices;
use kawara_core::domain::news::{SpaceId, UserId};
use kawara_core::infrastructure::memory::{
    InMemoryActivityFeed, InMemoryNoteStore, InMemoryPropertyStore, InMemorySpaceDirectory,
    RecordingEventBus, RecordingNotificationGateway, RecordingSearchIndex,
};

/// Fixed origin for deterministic timestamps.
static BASE_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2025-06-01T08:00:00Z")
        .expect("valid RFC3339 in tests/support/world.rs")
        .with_timezone(&Utc)
});

static TRACING: Lazy<()> = Lazy::new(|| {
    // Opt-in log output: RUST_LOG=debug cargo test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

/// Clock the tests can move by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(*BASE_NOW),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Everything a test needs: the wired services plus handles on every
/// in-memory collaborator.
pub struct World {
    pub services: ApplicationServices,
    pub notes: Arc<InMemoryNoteStore>,
    pub properties: Arc<InMemoryPropertyStore>,
    pub spaces: Arc<InMemorySpaceDirectory>,
    pub activities: Arc<InMemoryActivityFeed>,
    pub search: Arc<RecordingSearchIndex>,
    pub bus: Arc<RecordingEventBus>,
    pub notifications: Arc<RecordingNotificationGateway>,
    pub clock: Arc<ManualClock>,
}

impl World {
    pub fn new() -> Self {
        Lazy::force(&TRACING);
        let clock = Arc::new(ManualClock::new());
        let notes = Arc::new(InMemoryNoteStore::new(clock.clone()));
        let properties = Arc::new(InMemoryPropertyStore::new(clock.clone()));
        let spaces = Arc::new(InMemorySpaceDirectory::new());
        let activities = Arc::new(InMemoryActivityFeed::new());
        let search = Arc::new(RecordingSearchIndex::new());
        let bus = Arc::new(RecordingEventBus::new());
        let notifications = Arc::new(RecordingNotificationGateway::new());

        let services = ApplicationServices::new(
            notes.clone(),
            properties.clone(),
            spaces.clone(),
            activities.clone(),
            search.clone(),
            bus.clone(),
            notifications.clone(),
            clock.clone(),
        );

        Self {
            services,
            notes,
            properties,
            spaces,
            activities,
            search,
            bus,
            notifications,
            clock,
        }
    }

    /// One space with the usual cast: `ines` redacts, `paula` publishes,
    /// `mona` manages, `mark` is a plain member, `omar` is an outsider.
    pub fn seeded() -> Self {
        let world = Self::new();
        let space = SpaceId::new(1).unwrap();
        world.spaces.add_space(space, "engineering");
        world.spaces.add_redactor(space, &user("ines"));
        world.spaces.add_publisher(space, &user("paula"));
        world.spaces.add_manager(space, &user("mona"));
        world.spaces.add_member(space, &user("mark"));
        world
    }

    pub async fn post_article(&self, author: &ActorContext, space_id: i64, title: &str) -> NewsDto {
        self.post_article_with_body(author, space_id, title, "article body")
            .await
    }

    pub async fn post_article_with_body(
        &self,
        author: &ActorContext,
        space_id: i64,
        title: &str,
        body: &str,
    ) -> NewsDto {
        let command = CreateNewsCommand::builder()
            .space_id(space_id)
            .title(title)
            .body(body)
            .post(true)
            .activity_posted(true)
            .build()
            .unwrap();
        match self
            .services
            .news_commands
            .create_news(author, command)
            .await
            .unwrap()
        {
            NewsDocument::Article(dto) => dto,
            NewsDocument::Draft(_) => panic!("expected a posted article"),
        }
    }

    pub async fn draft_article(
        &self,
        author: &ActorContext,
        space_id: i64,
        title: &str,
    ) -> kawara_core::application::dto::DraftDto {
        let command = CreateNewsCommand::builder()
            .space_id(space_id)
            .title(title)
            .body("draft body")
            .activity_posted(true)
            .build()
            .unwrap();
        match self
            .services
            .news_commands
            .create_news(author, command)
            .await
            .unwrap()
        {
            NewsDocument::Draft(dto) => dto,
            NewsDocument::Article(_) => panic!("expected a draft"),
        }
    }
}

pub fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

pub fn actor(name: &str) -> ActorContext {
    ActorContext::new(name).unwrap()
}
