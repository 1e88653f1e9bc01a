//! Group membership integration tests
//!
//! Exercises the group service against a real Postgres instance: creation,
//! joining by code, leaving, leader restrictions, and member removal.

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use serial_test::serial;

use CommitteeHub::database::repositories::{GroupRepository, ProfileRepository};
use CommitteeHub::services::{GroupService, NotificationService};
use CommitteeHub::utils::errors::CommitteeHubError;

fn group_service(db: &TestDatabase) -> GroupService {
    GroupService::new(
        GroupRepository::new(db.pool.clone()),
        ProfileRepository::new(db.pool.clone()),
        NotificationService::default(),
    )
}

#[tokio::test]
#[serial]
async fn test_create_group_has_exactly_one_leader() {
    let db = TestDatabase::new().await.expect("test database");
    let service = group_service(&db);

    let (account, _) = db.seed_student("leader@test.in", "password123", "Asha", "Rao").await;

    let view = service.create_group(account.id).await.expect("create group");

    assert_eq!(view.group.code.len(), 6);
    assert_eq!(view.group.created_by, account.id);
    assert_eq!(view.members.len(), 1);
    assert_eq!(
        view.members.iter().filter(|m| m.leader).count(),
        1,
        "exactly one member carries the leader flag"
    );
    assert_eq!(view.leader, Some(account.id));

    // creating a second group while in one is refused
    let err = service.create_group(account.id).await.unwrap_err();
    assert_matches!(err, CommitteeHubError::AlreadyInGroup);
}

#[tokio::test]
#[serial]
async fn test_join_copies_profile_snapshot_and_backref() {
    let db = TestDatabase::new().await.expect("test database");
    let service = group_service(&db);

    let (leader, _) = db.seed_student("leader@test.in", "password123", "Asha", "Rao").await;
    let (joiner, joiner_student) =
        db.seed_student("joiner@test.in", "password123", "Binod", "Kumar").await;

    let created = service.create_group(leader.id).await.expect("create group");
    let view = service
        .join_group(joiner.id, &created.group.code)
        .await
        .expect("join group");

    assert_eq!(view.members.len(), 2);
    let member = view
        .members
        .iter()
        .find(|m| m.user_id == joiner.id)
        .expect("joined member present");

    // the member entry is a verbatim snapshot of the student profile
    assert!(!member.leader);
    assert_eq!(member.first_name, joiner_student.first_name);
    assert_eq!(member.last_name, joiner_student.last_name);
    assert_eq!(member.roll_no, joiner_student.roll_no);
    assert_eq!(member.branch, joiner_student.branch);
    assert_eq!(member.profile_photo, joiner_student.profile_photo);

    // the back-reference mirrors the group's code and creator
    let groups = GroupRepository::new(db.pool.clone());
    let backref = groups
        .find_backref(joiner.id)
        .await
        .expect("backref query")
        .expect("backref present");
    assert_eq!(backref.group_id, created.group.id);
    assert_eq!(backref.code, created.group.code);
    assert_eq!(backref.created_by, leader.id);
}

#[tokio::test]
#[serial]
async fn test_join_preconditions() {
    let db = TestDatabase::new().await.expect("test database");
    let service = group_service(&db);

    let (leader, _) = db.seed_student("leader@test.in", "password123", "Asha", "Rao").await;
    let (joiner, _) = db.seed_student("joiner@test.in", "password123", "Binod", "Kumar").await;

    let created = service.create_group(leader.id).await.expect("create group");

    // wrong length is rejected before any lookup
    let err = service.join_group(joiner.id, "ABC").await.unwrap_err();
    assert_matches!(err, CommitteeHubError::InvalidInput(_));

    // a 6-character code with no matching group
    let err = service.join_group(joiner.id, "!!!!!!").await.unwrap_err();
    assert_matches!(err, CommitteeHubError::GroupNotFound);

    // once in a group, any join fails regardless of code validity
    service
        .join_group(joiner.id, &created.group.code)
        .await
        .expect("join group");
    let err = service.join_group(joiner.id, "!!!!!!").await.unwrap_err();
    assert_matches!(err, CommitteeHubError::AlreadyInGroup);
    let err = service
        .join_group(joiner.id, &created.group.code)
        .await
        .unwrap_err();
    assert_matches!(err, CommitteeHubError::AlreadyInGroup);
}

#[tokio::test]
#[serial]
async fn test_leader_cannot_leave_with_members_present() {
    let db = TestDatabase::new().await.expect("test database");
    let service = group_service(&db);

    let (leader, _) = db.seed_student("leader@test.in", "password123", "Asha", "Rao").await;
    let (joiner, _) = db.seed_student("joiner@test.in", "password123", "Binod", "Kumar").await;

    let created = service.create_group(leader.id).await.expect("create group");
    service
        .join_group(joiner.id, &created.group.code)
        .await
        .expect("join group");

    let err = service.leave_group(leader.id).await.unwrap_err();
    assert_matches!(err, CommitteeHubError::LeaderCannotLeave);

    // the ordinary member leaves freely
    service.leave_group(joiner.id).await.expect("member leaves");
    assert!(service
        .resolve_current_group(joiner.id)
        .await
        .expect("resolve")
        .is_none());

    // now the leader is alone; leaving deletes the group itself
    service.leave_group(leader.id).await.expect("leader leaves");
    assert!(service
        .resolve_current_group(leader.id)
        .await
        .expect("resolve")
        .is_none());

    let groups = GroupRepository::new(db.pool.clone());
    assert!(groups
        .find_by_id(created.group.id)
        .await
        .expect("group query")
        .is_none());
}

#[tokio::test]
#[serial]
async fn test_remove_member_is_leader_only_and_never_self() {
    let db = TestDatabase::new().await.expect("test database");
    let service = group_service(&db);

    let (leader, _) = db.seed_student("leader@test.in", "password123", "Asha", "Rao").await;
    let (member, _) = db.seed_student("member@test.in", "password123", "Binod", "Kumar").await;

    let created = service.create_group(leader.id).await.expect("create group");
    service
        .join_group(member.id, &created.group.code)
        .await
        .expect("join group");

    // an ordinary member cannot remove anyone
    let err = service.remove_member(member.id, leader.id).await.unwrap_err();
    assert_matches!(err, CommitteeHubError::PermissionDenied(_));

    // the leader cannot target itself
    let err = service.remove_member(leader.id, leader.id).await.unwrap_err();
    assert_matches!(err, CommitteeHubError::InvalidInput(_));

    // the leader removes the member; both sides of the relation disappear
    service
        .remove_member(leader.id, member.id)
        .await
        .expect("remove member");

    let groups = GroupRepository::new(db.pool.clone());
    assert!(groups
        .find_member(created.group.id, member.id)
        .await
        .expect("member query")
        .is_none());
    assert!(groups
        .find_backref(member.id)
        .await
        .expect("backref query")
        .is_none());
}

#[tokio::test]
#[serial]
async fn test_transfer_leadership_then_leave() {
    let db = TestDatabase::new().await.expect("test database");
    let service = group_service(&db);

    let (leader, _) = db.seed_student("leader@test.in", "password123", "Asha", "Rao").await;
    let (member, _) = db.seed_student("member@test.in", "password123", "Binod", "Kumar").await;

    let created = service.create_group(leader.id).await.expect("create group");
    service
        .join_group(member.id, &created.group.code)
        .await
        .expect("join group");

    let view = service
        .transfer_leadership(leader.id, member.id)
        .await
        .expect("transfer leadership");

    assert_eq!(view.leader, Some(member.id));
    assert_eq!(view.group.created_by, member.id);
    assert_eq!(view.members.iter().filter(|m| m.leader).count(), 1);

    // the old leader is an ordinary member now and may leave
    service.leave_group(leader.id).await.expect("old leader leaves");

    let remaining = service
        .resolve_current_group(member.id)
        .await
        .expect("resolve")
        .expect("group still exists");
    assert_eq!(remaining.member_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_leader_resolves_group_without_backref() {
    let db = TestDatabase::new().await.expect("test database");
    let service = group_service(&db);

    let (leader, _) = db.seed_student("leader@test.in", "password123", "Asha", "Rao").await;
    let created = service.create_group(leader.id).await.expect("create group");

    // simulate the legacy case where the leader's back-reference was never
    // written: resolution falls back to the creator query
    sqlx::query("DELETE FROM student_groups WHERE user_id = $1")
        .bind(leader.id)
        .execute(&db.pool)
        .await
        .expect("delete backref");

    let view = service
        .resolve_current_group(leader.id)
        .await
        .expect("resolve")
        .expect("group found through creator fallback");
    assert_eq!(view.group.id, created.group.id);
    assert_eq!(view.leader, Some(leader.id));
}
