// tests/update_tests.rs
mod support;

use kawara_core::application::commands::news::{
    PublishNewsCommand, SaveLatestDraftCommand, UpdateArticleCommand, UpdateKind, UpdateNews,
};
use kawara_core::application::dto::NewsDocument;
use kawara_core::application::ports::notify::NotificationKind;
use kawara_core::domain::news::{NewsId, NoteStore, UserId};
use support::{World, actor};

fn content_update(id: i64, title: &str, body: &str) -> UpdateNews {
    UpdateNews::Article(UpdateArticleCommand {
        id,
        title: title.into(),
        body: body.into(),
        summary: None,
        kind: UpdateKind::ContentAndTitle,
        publish: false,
        post: None,
        audience: None,
        targets: None,
        lang: None,
        activity_posted: None,
        schedule_post_date: None,
    })
}

#[tokio::test]
async fn a_content_update_consumes_the_stale_draft_and_reindexes() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "v1").await;

    world
        .services
        .news_commands
        .update_news(
            &ines,
            UpdateNews::LatestDraft(SaveLatestDraftCommand {
                article_id: posted.id,
                title: "v2".into(),
                body: "new body".into(),
                summary: None,
                lang: None,
                activity_posted: true,
            }),
        )
        .await
        .unwrap();

    let updated = world
        .services
        .news_commands
        .update_news(&ines, content_update(posted.id, "v2", "new body"))
        .await
        .unwrap();
    let NewsDocument::Article(updated) = updated else {
        panic!("expected an article");
    };
    assert_eq!(updated.title, "v2");

    // The draft that fed the edit is gone and the article was reindexed.
    let drafts = world
        .notes
        .drafts_of_note(NewsId::new(posted.id).unwrap())
        .await
        .unwrap();
    assert!(drafts.is_empty());
    assert!(
        world
            .search
            .reindexed_ids()
            .contains(&posted.id.to_string())
    );
    assert!(world.bus.count_of("news.update") >= 1);
}

#[tokio::test]
async fn mention_notifications_skip_users_already_notified() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world
        .post_article_with_body(&ines, 1, "mentions", "ping @maia please")
        .await;

    world
        .services
        .news_commands
        .update_news(
            &ines,
            content_update(posted.id, "mentions", "ping @maia and @noor please"),
        )
        .await
        .unwrap();

    let mention_batches: Vec<_> = world
        .notifications
        .sent()
        .into_iter()
        .filter_map(|request| match request.kind {
            NotificationKind::Mention { mentioned } => Some(mentioned),
            _ => None,
        })
        .collect();
    // One batch from the post (maia), one from the update (noor only).
    assert_eq!(mention_batches.len(), 2);
    let last = mention_batches.last().unwrap();
    assert_eq!(last.len(), 1);
    assert!(last.contains(&UserId::new("noor").unwrap()));
}

#[tokio::test]
async fn widening_the_audience_excludes_already_notified_members() {
    let world = World::seeded();
    let ines = actor("ines");
    let paula = actor("paula");
    let posted = world.post_article(&ines, 1, "goes wide").await;
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
        .update_news(
            &paula,
            UpdateNews::Article(UpdateArticleCommand {
                id: posted.id,
                title: "goes wide".into(),
                body: "article body".into(),
                summary: None,
                kind: UpdateKind::PostingAndPublishing,
                publish: true,
                post: None,
                audience: Some("all".into()),
                targets: None,
                lang: None,
                activity_posted: None,
                schedule_post_date: None,
            }),
        )
        .await
        .unwrap();

    let suppressing: Vec<_> = world
        .notifications
        .sent()
        .into_iter()
        .filter(|request| {
            matches!(
                request.kind,
                NotificationKind::Publish {
                    exclude_space_members: true,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(suppressing.len(), 1);

    let refreshed = world
        .services
        .news_queries
        .get_article(&paula, posted.id, None, true)
        .await
        .unwrap();
    assert_eq!(refreshed.audience.as_deref(), Some("all"));
    assert!(refreshed.published);
}

#[tokio::test]
async fn a_translation_routed_through_update_lands_on_the_language() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "root").await;

    let result = world
        .services
        .news_commands
        .update_news(
            &ines,
            UpdateNews::Article(UpdateArticleCommand {
                id: posted.id,
                title: "wurzel".into(),
                body: "inhalt".into(),
                summary: None,
                kind: UpdateKind::ContentAndTitle,
                publish: false,
                post: None,
                audience: None,
                targets: None,
                lang: Some("de".into()),
                activity_posted: None,
                schedule_post_date: None,
            }),
        )
        .await
        .unwrap();
    let NewsDocument::Article(translated) = result else {
        panic!("expected an article");
    };
    assert_eq!(translated.lang.as_deref(), Some("de"));
    assert_eq!(world.bus.count_of("news.translation.add"), 1);
    assert!(
        world
            .search
            .reindexed_ids()
            .contains(&format!("{}-de", posted.id))
    );
}

#[tokio::test]
async fn target_changes_on_a_published_article_are_applied() {
    let world = World::seeded();
    let ines = actor("ines");
    let paula = actor("paula");
    let posted = world.post_article(&ines, 1, "pinned update").await;
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

    world
        .services
        .news_commands
        .update_news(
            &paula,
            UpdateNews::Article(UpdateArticleCommand {
                id: posted.id,
                title: "pinned update".into(),
                body: "article body".into(),
                summary: None,
                kind: UpdateKind::PostingAndPublishing,
                publish: true,
                post: None,
                audience: None,
                targets: Some(vec!["mobile".into()]),
                lang: None,
                activity_posted: None,
                schedule_post_date: None,
            }),
        )
        .await
        .unwrap();

    let refreshed = world
        .services
        .news_queries
        .get_article(&paula, posted.id, None, true)
        .await
        .unwrap();
    assert_eq!(refreshed.targets, vec!["mobile".to_owned()]);
}
