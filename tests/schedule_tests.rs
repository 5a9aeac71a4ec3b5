// tests/schedule_tests.rs
mod support;

use chrono::{Duration, FixedOffset, TimeZone};
use kawara_core::application::commands::news::ScheduleNewsCommand;
use kawara_core::application::error::ApplicationError;
use support::{World, actor};

fn local_time(hour: u32) -> chrono::DateTime<FixedOffset> {
    // UTC+2 caller-local wall time.
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 6, 1, hour, 30, 0)
        .unwrap()
}

#[tokio::test]
async fn firing_the_scheduler_promotes_without_duplicating_anything() {
    let world = World::seeded();
    let mona = actor("mona");
    let draft = world.draft_article(&mona, 1, "friday announcement").await;

    let staged = world
        .services
        .news_commands
        .schedule_news(
            &mona,
            ScheduleNewsCommand {
                id: draft.id,
                schedule_post_date: local_time(14),
                published: false,
                audience: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(staged.publication_state, "staged");
    // 14:30 at UTC+2 is 12:30 UTC.
    assert_eq!(
        staged.schedule_post_date.unwrap().to_rfc3339(),
        "2025-06-01T12:30:00+00:00"
    );
    assert!(staged.activities.is_empty());

    // Nothing is due yet.
    let posted = world.services.news_commands.post_due_articles().await.unwrap();
    assert_eq!(posted, 0);

    world.clock.advance(Duration::hours(5));
    let posted = world.services.news_commands.post_due_articles().await.unwrap();
    assert_eq!(posted, 1);

    let live = world
        .services
        .news_queries
        .get_article(&mona, staged.id, None, true)
        .await
        .unwrap();
    assert_eq!(live.publication_state, "posted");
    assert!(live.schedule_post_date.is_none());
    assert_eq!(live.id, staged.id);
    assert_eq!(live.activities.len(), 1);

    // A second scan finds nothing staged and changes nothing.
    let posted = world.services.news_commands.post_due_articles().await.unwrap();
    assert_eq!(posted, 0);
    let unchanged = world
        .services
        .news_queries
        .get_article(&mona, staged.id, None, true)
        .await
        .unwrap();
    assert_eq!(unchanged.activities.len(), 1);
    assert_eq!(world.activities.all().len(), 1);
}

#[tokio::test]
async fn staged_articles_are_hidden_from_users_who_cannot_schedule() {
    let world = World::seeded();
    let mona = actor("mona");
    let mark = actor("mark");
    let draft = world.draft_article(&mona, 1, "embargoed").await;
    let staged = world
        .services
        .news_commands
        .schedule_news(
            &mona,
            ScheduleNewsCommand {
                id: draft.id,
                schedule_post_date: local_time(18),
                published: false,
                audience: None,
            },
        )
        .await
        .unwrap();

    let err = world
        .services
        .news_queries
        .get_article(&mark, staged.id, None, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    // A manager can still read it.
    let visible = world
        .services
        .news_queries
        .get_article(&mona, staged.id, None, true)
        .await
        .unwrap();
    assert_eq!(visible.id, staged.id);
}

#[tokio::test]
async fn scheduling_requires_the_scheduling_role() {
    let world = World::seeded();
    let mona = actor("mona");
    let mark = actor("mark");
    let draft = world.draft_article(&mona, 1, "not for members").await;

    let err = world
        .services
        .news_commands
        .schedule_news(
            &mark,
            ScheduleNewsCommand {
                id: draft.id,
                schedule_post_date: local_time(9),
                published: false,
                audience: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn a_publisher_scheduling_syncs_the_published_flag() {
    let world = World::seeded();
    let paula = actor("paula");
    let draft = world.draft_article(&paula, 1, "published on arrival").await;

    let staged = world
        .services
        .news_commands
        .schedule_news(
            &paula,
            ScheduleNewsCommand {
                id: draft.id,
                schedule_post_date: local_time(10),
                published: true,
                audience: Some("all".into()),
            },
        )
        .await
        .unwrap();
    assert!(staged.published);
    assert_eq!(staged.audience.as_deref(), Some("all"));
}
