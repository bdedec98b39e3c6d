use std::time::Duration;

use rust_decimal_macros::dec;

use wishfund_core::contributions::{ContributionError, ContributionServiceTrait, NewContribution};
use wishfund_core::goals::{GoalError, GoalServiceTrait, GoalUpdate};

mod common;

#[tokio::test(flavor = "multi_thread")]
async fn identical_goal_for_same_owner_is_rejected() {
    let ledger = common::new_ledger();

    ledger
        .goals
        .create_goal(common::new_goal("bob", "Telescope", dec!(100.00)))
        .await
        .unwrap();

    let duplicate = ledger
        .goals
        .create_goal(common::new_goal("bob", "Telescope", dec!(100.00)))
        .await;
    assert!(matches!(duplicate, Err(GoalError::DuplicateGoal)));

    // Changing any one key field makes it a different goal.
    ledger
        .goals
        .create_goal(common::new_goal("bob", "Telescope", dec!(99.00)))
        .await
        .unwrap();

    // A different owner may post the identical goal.
    ledger
        .goals
        .create_goal(common::new_goal("alice", "Telescope", dec!(100.00)))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn goal_edits_are_blocked_once_funding_starts() {
    let ledger = common::new_ledger();
    common::seed_user(&ledger.users, "bob", Some("bob"));
    common::seed_user(&ledger.users, "alice", Some("alice"));

    let goal = ledger
        .goals
        .create_goal(common::new_goal("bob", "Telescope", dec!(100.00)))
        .await
        .unwrap();

    // A non-owner may not edit at all.
    let by_stranger = ledger
        .goals
        .update_goal(
            &goal.id,
            "alice",
            GoalUpdate {
                name: Some("Better telescope".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(by_stranger, Err(GoalError::NotAllowed(_))));

    // The owner may edit while nothing has been contributed.
    let updated = ledger
        .goals
        .update_goal(
            &goal.id,
            "bob",
            GoalUpdate {
                name: Some("Better telescope".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Better telescope");

    ledger
        .contributions
        .create_contribution(NewContribution {
            goal_id: goal.id.clone(),
            contributor_id: "alice".to_string(),
            amount: dec!(10.00),
            hidden: false,
        })
        .await
        .unwrap();

    let after_funding = ledger
        .goals
        .update_goal(
            &goal.id,
            "bob",
            GoalUpdate {
                name: Some("Different telescope".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(after_funding, Err(GoalError::AlreadyFunded(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn copying_bumps_popularity_and_starts_a_fresh_goal() {
    let ledger = common::new_ledger();

    let source = ledger
        .goals
        .create_goal(common::new_goal("bob", "Globe", dec!(50.00)))
        .await
        .unwrap();
    assert_eq!(source.copied_count, 0);

    let copy = ledger.goals.copy_goal(&source.id, "alice").await.unwrap();
    assert_eq!(copy.owner_id, "alice");
    assert_eq!(copy.name, source.name);
    assert_eq!(copy.description, source.description);
    assert_eq!(copy.price, dec!(50.00));
    assert_eq!(copy.raised, dec!(0));
    assert_eq!(copy.copied_count, 0);

    let source = ledger.goals.get_goal(&source.id).unwrap();
    assert_eq!(source.copied_count, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn copy_rejections_leave_the_popularity_counter_unchanged() {
    let ledger = common::new_ledger();

    let source = ledger
        .goals
        .create_goal(common::new_goal("bob", "Globe", dec!(50.00)))
        .await
        .unwrap();

    let self_copy = ledger.goals.copy_goal(&source.id, "bob").await;
    assert!(matches!(self_copy, Err(GoalError::SelfCopy)));

    ledger.goals.copy_goal(&source.id, "alice").await.unwrap();
    let again = ledger.goals.copy_goal(&source.id, "alice").await;
    assert!(matches!(again, Err(GoalError::AlreadyCopied)));

    let source = ledger.goals.get_goal(&source.id).unwrap();
    assert_eq!(source.copied_count, 1);

    let missing = ledger.goals.copy_goal("no-such-goal", "alice").await;
    assert!(matches!(missing, Err(GoalError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_goal_cascades_to_its_contributions() {
    let ledger = common::new_ledger();
    common::seed_user(&ledger.users, "bob", Some("bob"));
    common::seed_user(&ledger.users, "alice", Some("alice"));

    let goal = ledger
        .goals
        .create_goal(common::new_goal("bob", "Scarf", dec!(30.00)))
        .await
        .unwrap();
    let created = ledger
        .contributions
        .create_contribution(NewContribution {
            goal_id: goal.id.clone(),
            contributor_id: "alice".to_string(),
            amount: dec!(10.00),
            hidden: false,
        })
        .await
        .unwrap();

    let by_stranger = ledger.goals.delete_goal(&goal.id, "alice").await;
    assert!(matches!(by_stranger, Err(GoalError::NotAllowed(_))));

    ledger.goals.delete_goal(&goal.id, "bob").await.unwrap();
    assert!(matches!(
        ledger.goals.get_goal(&goal.id),
        Err(GoalError::NotFound(_))
    ));
    let orphan = ledger
        .contributions
        .get_contribution(&created.id, Some("alice"))
        .await;
    assert!(matches!(orphan, Err(ContributionError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn feeds_order_and_cap_goals() {
    let ledger = common::new_ledger();

    let oldest = ledger
        .goals
        .create_goal(common::new_goal("bob", "First", dec!(10.00)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    ledger
        .goals
        .create_goal(common::new_goal("bob", "Second", dec!(20.00)))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newest = ledger
        .goals
        .create_goal(common::new_goal("carol", "Third", dec!(30.00)))
        .await
        .unwrap();

    let recent = ledger.goals.list_recent(1).unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0].id, newest.id);
    assert_eq!(recent[2].id, oldest.id);

    // Make the oldest goal the most copied one.
    ledger.goals.copy_goal(&oldest.id, "dave").await.unwrap();
    let top = ledger.goals.list_top().unwrap();
    assert_eq!(top[0].id, oldest.id);

    let feed = ledger.goals.combined_feed(1).unwrap();
    let ids: Vec<_> = feed.iter().map(|g| g.id.clone()).collect();
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());

    let owned = ledger.goals.list_goals_by_owner("bob").unwrap();
    assert_eq!(owned.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn goal_validation_rejects_bad_input() {
    let ledger = common::new_ledger();

    let free = ledger
        .goals
        .create_goal(common::new_goal("bob", "Freebie", dec!(0)))
        .await;
    assert!(matches!(free, Err(GoalError::InvalidData(_))));

    let nameless = ledger
        .goals
        .create_goal(common::new_goal("bob", "  ", dec!(10.00)))
        .await;
    assert!(matches!(nameless, Err(GoalError::InvalidData(_))));
}
