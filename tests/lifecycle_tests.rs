// tests/lifecycle_tests.rs
mod support;

use kawara_core::application::commands::news::{PostNewsCommand, ShareNewsCommand};
use kawara_core::application::dto::NewsDocument;
use kawara_core::application::error::ApplicationError;
use kawara_core::application::queries::news::{GetNewsQuery, NewsObject};
use kawara_core::domain::news::{DraftId, NoteStore, SpaceId};
use support::{World, actor, user};

#[tokio::test]
async fn draft_promotion_appends_exactly_one_activity() {
    let world = World::seeded();
    let ines = actor("ines");
    let draft = world.draft_article(&ines, 1, "quarterly recap").await;

    let posted = world
        .services
        .news_commands
        .post_news(
            &ines,
            PostNewsCommand {
                id: draft.id,
                published: false,
                audience: None,
                targets: vec![],
                activity_posted: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(posted.activities.len(), 1);
    assert_eq!(posted.publication_state, "posted");
    assert_eq!(world.bus.count_of("news.gamification.post"), 1);
    assert_eq!(world.bus.count_of("news.post"), 1);

    // The draft was consumed by the promotion.
    let gone = world
        .notes
        .get_draft(DraftId::new(draft.id).unwrap())
        .await
        .unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn replayed_promotion_does_not_duplicate_the_activity() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "release notes").await;

    let replayed = world
        .services
        .news_commands
        .post_news(
            &ines,
            PostNewsCommand {
                id: posted.id,
                published: false,
                audience: None,
                targets: vec![],
                activity_posted: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(replayed.activities.len(), 1);
    assert_eq!(replayed.activities, posted.activities);
    assert_eq!(world.activities.all().len(), 1);
}

#[tokio::test]
async fn sharing_grows_the_activity_list_and_keeps_the_primary_first() {
    let world = World::seeded();
    let ines = actor("ines");
    for raw in [2_i64, 3] {
        let space = SpaceId::new(raw).unwrap();
        world.spaces.add_space(space, format!("space-{raw}"));
        world.spaces.add_member(space, &user("ines"));
    }
    let posted = world.post_article(&ines, 1, "shared far and wide").await;
    let primary = posted.activities[0].clone();

    for (space_id, activity_id) in [(2_i64, 201_i64), (3, 301)] {
        world
            .services
            .news_commands
            .share_news(
                &ines,
                ShareNewsCommand {
                    id: posted.id,
                    space_id,
                    activity_id,
                },
            )
            .await
            .unwrap();
    }

    let refreshed = world
        .services
        .news_queries
        .get_article(&ines, posted.id, None, true)
        .await
        .unwrap();
    assert_eq!(refreshed.activities.len(), 3);
    assert_eq!(refreshed.activities[0], primary);
    assert_eq!(world.bus.count_of("news.share"), 2);

    // Members of the shared space can read the article now.
    let read_spaces = world
        .notes
        .read_spaces(kawara_core::domain::news::NewsId::new(posted.id).unwrap());
    assert!(read_spaces.contains(&SpaceId::new(3).unwrap()));
}

#[tokio::test]
async fn creation_requires_authoring_rights_in_the_space() {
    let world = World::seeded();
    let outsider = actor("omar");
    let command = kawara_core::application::commands::news::CreateNewsCommand::builder()
        .space_id(1)
        .title("sneaky")
        .body("nope")
        .build()
        .unwrap();
    let err = world
        .services
        .news_commands
        .create_news(&outsider, command)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn latest_draft_read_falls_back_to_the_article() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "stable title").await;

    let document = world
        .services
        .news_queries
        .get_news_by_id(
            &ines,
            GetNewsQuery {
                id: posted.id,
                object: NewsObject::LatestDraft,
                lang: None,
                edit_mode: false,
                fallback_language: true,
            },
        )
        .await
        .unwrap();
    assert!(matches!(document, NewsDocument::Article(_)));
}

#[tokio::test]
async fn news_for_activity_follows_shared_copies() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "original post").await;
    let primary_activity = posted.activities[0]
        .split(':')
        .nth(1)
        .unwrap()
        .parse::<i64>()
        .unwrap();

    let other_space = SpaceId::new(2).unwrap();
    world.spaces.add_space(other_space, "marketing");
    let copy = world.activities.add_shared_copy(
        kawara_core::domain::news::ActivityId(primary_activity),
        other_space,
    );

    let resolved = world
        .services
        .news_queries
        .news_for_activity(&ines, copy.id.into())
        .await
        .unwrap();
    assert_eq!(resolved.id, posted.id);
}
