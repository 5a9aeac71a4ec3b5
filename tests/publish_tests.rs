// tests/publish_tests.rs
mod support;

use kawara_core::application::commands::news::PublishNewsCommand;
use kawara_core::application::error::ApplicationError;
use kawara_core::application::ports::notify::NotificationKind;
use support::{World, actor};

#[tokio::test]
async fn publish_unpublish_publish_restores_the_final_audience() {
    let world = World::seeded();
    let ines = actor("ines");
    let paula = actor("paula");
    let posted = world.post_article(&ines, 1, "company update").await;

    world
        .services
        .news_commands
        .publish_news(
            &paula,
            PublishNewsCommand {
                id: posted.id,
                audience: Some("space".into()),
                targets: None,
            },
        )
        .await
        .unwrap();

    world
        .services
        .news_commands
        .unpublish_news(&paula, posted.id)
        .await
        .unwrap();
    let unpublished = world
        .services
        .news_queries
        .get_article(&paula, posted.id, None, true)
        .await
        .unwrap();
    assert!(!unpublished.published);
    assert!(unpublished.audience.is_none());

    world
        .services
        .news_commands
        .publish_news(
            &paula,
            PublishNewsCommand {
                id: posted.id,
                audience: Some("all".into()),
                targets: None,
            },
        )
        .await
        .unwrap();
    let republished = world
        .services
        .news_queries
        .get_article(&paula, posted.id, None, true)
        .await
        .unwrap();
    assert!(republished.published);
    assert_eq!(republished.audience.as_deref(), Some("all"));
    assert_eq!(world.bus.count_of("news.publish"), 2);
}

#[tokio::test]
async fn publish_replaces_target_assignments() {
    let world = World::seeded();
    let ines = actor("ines");
    let paula = actor("paula");
    let posted = world.post_article(&ines, 1, "targeted news").await;

    world
        .services
        .news_commands
        .publish_news(
            &paula,
            PublishNewsCommand {
                id: posted.id,
                audience: Some("all".into()),
                targets: Some(vec!["homepage".into(), "mobile".into()]),
            },
        )
        .await
        .unwrap();

    world
        .services
        .news_commands
        .publish_news(
            &paula,
            PublishNewsCommand {
                id: posted.id,
                audience: Some("all".into()),
                targets: Some(vec!["homepage".into()]),
            },
        )
        .await
        .unwrap();

    let refreshed = world
        .services
        .news_queries
        .get_article(&paula, posted.id, None, true)
        .await
        .unwrap();
    assert_eq!(refreshed.targets, vec!["homepage".to_owned()]);
}

#[tokio::test]
async fn publish_survives_a_notification_outage() {
    let world = World::seeded();
    let ines = actor("ines");
    let paula = actor("paula");
    let posted = world.post_article(&ines, 1, "resilient").await;

    world.notifications.set_failing(true);
    world
        .services
        .news_commands
        .publish_news(
            &paula,
            PublishNewsCommand {
                id: posted.id,
                audience: Some("all".into()),
                targets: None,
            },
        )
        .await
        .unwrap();
    world.notifications.set_failing(false);

    let refreshed = world
        .services
        .news_queries
        .get_article(&paula, posted.id, None, true)
        .await
        .unwrap();
    assert!(refreshed.published);
}

#[tokio::test]
async fn publishing_requires_the_publish_capability() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "not yours to publish").await;

    // A redactor without publish rights cannot flip the flag.
    let err = world
        .services
        .news_commands
        .publish_news(
            &ines,
            PublishNewsCommand {
                id: posted.id,
                audience: None,
                targets: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn publish_notification_carries_the_audience() {
    let world = World::seeded();
    let ines = actor("ines");
    let paula = actor("paula");
    let posted = world.post_article(&ines, 1, "audience check").await;

    world
        .services
        .news_commands
        .publish_news(
            &paula,
            PublishNewsCommand {
                id: posted.id,
                audience: Some("space".into()),
                targets: None,
            },
        )
        .await
        .unwrap();

    let publish_notifications: Vec<_> = world
        .notifications
        .sent()
        .into_iter()
        .filter(|request| matches!(request.kind, NotificationKind::Publish { .. }))
        .collect();
    assert_eq!(publish_notifications.len(), 1);
    match &publish_notifications[0].kind {
        NotificationKind::Publish {
            audience,
            exclude_space_members,
        } => {
            assert_eq!(
                audience.map(|a| a.as_str()),
                Some("space")
            );
            assert!(!exclude_space_members);
        }
        other => panic!("unexpected notification kind: {other:?}"),
    }
}
