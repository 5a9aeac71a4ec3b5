// tests/targeting_tests.rs
mod support;

use std::time::Duration;

use kawara_core::application::commands::targets::TargetDefinition;
use kawara_core::application::error::ApplicationError;
use kawara_core::domain::news::{NewsId, SpaceId, TargetName};
use support::{World, actor, user};

fn slider() -> TargetDefinition {
    TargetDefinition {
        name: "homepage-slider".into(),
        label: Some("Homepage slider".into()),
        description: None,
    }
}

#[tokio::test]
async fn creating_a_target_twice_is_a_conflict() {
    let world = World::seeded();
    let admin = actor("admin");
    world.spaces.grant_platform_manager(&user("admin"));

    let targeting = &world.services.targeting;
    targeting.create_target(&admin, slider()).await.unwrap();
    let err = targeting.create_target(&admin, slider()).await.unwrap_err();
    assert!(matches!(err, ApplicationError::Conflict(_)));
}

#[tokio::test]
async fn target_management_requires_the_platform_manager_role() {
    let world = World::seeded();
    let mona = actor("mona");
    let err = world
        .services
        .targeting
        .create_target(&mona, slider())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn duplicate_assignment_is_swallowed() {
    let world = World::seeded();
    let ines = actor("ines");
    let paula = actor("paula");
    let posted = world.post_article(&ines, 1, "pinned").await;
    let id = NewsId::new(posted.id).unwrap();
    let space = SpaceId::new(1).unwrap();
    let names = [TargetName::new("homepage-slider").unwrap()];

    let targeting = &world.services.targeting;
    targeting
        .assign(&paula, id, space, &names, true)
        .await
        .unwrap();
    // Same assignment again: logged, not an error, same end state.
    targeting
        .assign(&paula, id, space, &names, true)
        .await
        .unwrap();

    let assigned = targeting.targets_for(id).await.unwrap();
    assert_eq!(assigned.len(), 1);
}

#[tokio::test]
async fn assignment_requires_the_publish_capability() {
    let world = World::seeded();
    let ines = actor("ines");
    let posted = world.post_article(&ines, 1, "no pin for you").await;
    let id = NewsId::new(posted.id).unwrap();
    let space = SpaceId::new(1).unwrap();
    let names = [TargetName::new("homepage-slider").unwrap()];

    let err = world
        .services
        .targeting
        .assign(&ines, id, space, &names, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    let err = world
        .services
        .targeting
        .unassign_all_checked(&ines, id, space)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn a_no_op_target_update_is_rejected() {
    let world = World::seeded();
    let admin = actor("admin");
    world.spaces.grant_platform_manager(&user("admin"));
    let targeting = &world.services.targeting;
    targeting.create_target(&admin, slider()).await.unwrap();

    let err = targeting
        .update_target(&admin, "homepage-slider", slider())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Conflict(_)));

    let err = targeting
        .update_target(&admin, "missing-target", slider())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(_)));
}

#[tokio::test]
async fn renaming_a_target_rekeys_its_assignments() {
    let world = World::seeded();
    let admin = actor("admin");
    let ines = actor("ines");
    let paula = actor("paula");
    world.spaces.grant_platform_manager(&user("admin"));
    let targeting = &world.services.targeting;
    targeting.create_target(&admin, slider()).await.unwrap();

    let posted = world.post_article(&ines, 1, "pinned through rename").await;
    let id = NewsId::new(posted.id).unwrap();
    targeting
        .assign(
            &paula,
            id,
            SpaceId::new(1).unwrap(),
            &[TargetName::new("homepage-slider").unwrap()],
            true,
        )
        .await
        .unwrap();

    targeting
        .update_target(
            &admin,
            "homepage-slider",
            TargetDefinition {
                name: "frontpage".into(),
                label: Some("Homepage slider".into()),
                description: None,
            },
        )
        .await
        .unwrap();

    let assigned = targeting.targets_for(id).await.unwrap();
    assert_eq!(assigned, vec![TargetName::new("frontpage").unwrap()]);
    let ids = targeting
        .news_ids_for_target(&TargetName::new("frontpage").unwrap(), true)
        .await
        .unwrap();
    assert_eq!(ids, vec![id]);
}

#[tokio::test(start_paused = true)]
async fn target_deletion_has_its_own_grace_period() {
    let world = World::seeded();
    let admin = actor("admin");
    let mona = actor("mona");
    world.spaces.grant_platform_manager(&user("admin"));
    world.spaces.grant_platform_manager(&user("mona"));
    let targeting = &world.services.targeting;
    targeting.create_target(&admin, slider()).await.unwrap();

    std::sync::Arc::clone(targeting)
        .request_delete_target(&admin, "homepage-slider", Duration::from_secs(5))
        .await
        .unwrap();
    // Another manager cannot undo someone else's pending deletion.
    let err = targeting
        .undo_delete_target(&mona, "homepage-slider")
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));

    targeting
        .undo_delete_target(&admin, "homepage-slider")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;

    let targets = targeting.list_targets().await.unwrap();
    assert_eq!(targets.len(), 1);
}
