// tests/delete_tests.rs
mod support;

use std::sync::Arc;
use std::time::Duration;

use kawara_core::application::commands::news::{
    AddTranslationCommand, SaveLatestDraftCommand, UpdateNews,
};
use kawara_core::application::error::ApplicationError;
use support::{World, actor};

#[tokio::test]
async fn deleting_an_article_with_translations_unindexes_every_language() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "multilingual").await;

    for lang in ["fr", "en"] {
        world
            .services
            .news_commands
            .add_translation_version(
                &ines,
                AddTranslationCommand {
                    id: posted.id,
                    lang: lang.into(),
                    title: format!("title-{lang}"),
                    body: format!("body-{lang}"),
                    summary: None,
                },
            )
            .await
            .unwrap();
    }
    // An outstanding edit draft must also disappear with the article.
    world
        .services
        .news_commands
        .update_news(
            &ines,
            UpdateNews::LatestDraft(SaveLatestDraftCommand {
                article_id: posted.id,
                title: "pending edit".into(),
                body: "pending body".into(),
                summary: None,
                lang: None,
                activity_posted: true,
            }),
        )
        .await
        .unwrap();

    world
        .services
        .news_commands
        .delete_news(&ines, posted.id)
        .await
        .unwrap();

    let unindexed = world.search.unindexed_ids();
    assert!(unindexed.contains(&posted.id.to_string()));
    assert!(unindexed.contains(&format!("{}-fr", posted.id)));
    assert!(unindexed.contains(&format!("{}-en", posted.id)));

    assert!(world.activities.all().is_empty());
    assert_eq!(world.bus.count_of("news.delete"), 1);

    let err = world
        .services
        .news_queries
        .get_article(&ines, posted.id, None, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn deletion_requires_redaction_rights() {
    let world = World::seeded();
    let ines = actor("ines");
    let paula = actor("paula");
    let posted = world.post_article(&ines, 1, "protected").await;

    // The publish capability alone is not enough to delete.
    let err = world
        .services
        .news_commands
        .delete_news(&paula, posted.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test(start_paused = true)]
async fn undo_within_the_grace_period_keeps_the_article() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "saved by undo").await;
    let commands = Arc::clone(&world.services.news_commands);

    Arc::clone(&commands)
        .request_delete(&ines, posted.id, Duration::from_secs(5))
        .await
        .unwrap();
    commands.undo_delete(&ines, posted.id).await.unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;

    let alive = world
        .services
        .news_queries
        .get_article(&ines, posted.id, None, true)
        .await
        .unwrap();
    assert_eq!(alive.id, posted.id);
    assert_eq!(world.bus.count_of("news.delete"), 0);
}

#[tokio::test(start_paused = true)]
async fn undo_by_another_caller_is_forbidden_and_the_deletion_fires() {
    let world = World::seeded();
    let ines = actor("ines");
    let mona = actor("mona");
    let posted = world.post_article(&ines, 1, "doomed").await;
    let commands = Arc::clone(&world.services.news_commands);

    Arc::clone(&commands)
        .request_delete(&ines, posted.id, Duration::from_secs(5))
        .await
        .unwrap();
    let err = commands.undo_delete(&mona, posted.id).await.unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    tokio::time::sleep(Duration::from_secs(6)).await;
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let err = world
        .services
        .news_queries
        .get_article(&ines, posted.id, None, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn a_zero_delay_deletes_immediately() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "no grace").await;
    let commands = Arc::clone(&world.services.news_commands);

    Arc::clone(&commands)
        .request_delete(&ines, posted.id, Duration::ZERO)
        .await
        .unwrap();

    let err = world
        .services
        .news_queries
        .get_article(&ines, posted.id, None, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}
