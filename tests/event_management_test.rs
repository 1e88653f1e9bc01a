//! Event management integration tests
//!
//! Creation permissions, validation at the service boundary, listings,
//! and deletion rules for hosts versus admins.

mod helpers;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use helpers::*;
use serial_test::serial;

use CommitteeHub::database::repositories::{EventRepository, RegistrationRepository};
use CommitteeHub::models::profile::Role;
use CommitteeHub::services::{EventService, NotificationService};
use CommitteeHub::utils::errors::CommitteeHubError;

fn event_service(db: &TestDatabase) -> (EventService, NotificationService) {
    let notifications = NotificationService::default();
    let service = EventService::new(
        EventRepository::new(db.pool.clone()),
        RegistrationRepository::new(db.pool.clone()),
        notifications.clone(),
    );
    (service, notifications)
}

#[tokio::test]
#[serial]
async fn test_students_cannot_create_events() {
    let db = TestDatabase::new().await.expect("test database");
    let (service, _) = event_service(&db);

    let (student, _) = db.seed_student("student@test.in", "password123", "Asha", "Rao").await;

    let err = service
        .create_event(student.id, Role::Student, event_request("Tech Talk", None))
        .await
        .unwrap_err();
    assert_matches!(err, CommitteeHubError::PermissionDenied(_));
}

#[tokio::test]
#[serial]
async fn test_host_creates_and_lists_own_events() {
    let db = TestDatabase::new().await.expect("test database");
    let (service, _) = event_service(&db);

    let (host, _) = db.seed_student("host@test.in", "password123", "Meera", "Joshi").await;
    let (other, _) = db.seed_student("other@test.in", "password123", "Ravi", "Iyer").await;

    let event = service
        .create_event(host.id, Role::Host, event_request("Tech Talk", Some("500")))
        .await
        .expect("create event");
    service
        .create_event(other.id, Role::Host, event_request("Dance Night", None))
        .await
        .expect("create second event");

    assert_eq!(event.fee(), 500);
    assert!(event.requires_payment());

    let mine = service.list_created_by(host.id).await.expect("list mine");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, event.id);

    let all = service.list_events().await.expect("list all");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_cancellation_window_enforced_at_creation() {
    let db = TestDatabase::new().await.expect("test database");
    let (service, _) = event_service(&db);

    let (host, _) = db.seed_student("host@test.in", "password123", "Meera", "Joshi").await;

    // one day before the start is outside the [start-5, start-2] window
    let mut request = event_request("Tech Talk", None);
    request.cancellation_date = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
    let err = service
        .create_event(host.id, Role::Host, request)
        .await
        .unwrap_err();
    assert_matches!(err, CommitteeHubError::InvalidInput(_));

    // the window edges are accepted
    let mut request = event_request("Tech Talk", None);
    request.cancellation_date = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
    service
        .create_event(host.id, Role::Host, request)
        .await
        .expect("five days before accepted");

    let mut request = event_request("Another Talk", None);
    request.cancellation_date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
    service
        .create_event(host.id, Role::Host, request)
        .await
        .expect("two days before accepted");
}

#[tokio::test]
#[serial]
async fn test_hosts_delete_own_events_admins_delete_any() {
    let db = TestDatabase::new().await.expect("test database");
    let (service, notifications) = event_service(&db);

    let (host, _) = db.seed_student("host@test.in", "password123", "Meera", "Joshi").await;
    let (other_host, _) = db.seed_student("other@test.in", "password123", "Ravi", "Iyer").await;
    let (admin, _) = db.seed_student("admin@test.in", "password123", "Nidhi", "Shah").await;

    let event = service
        .create_event(host.id, Role::Host, event_request("Tech Talk", None))
        .await
        .expect("create event");
    let second = service
        .create_event(host.id, Role::Host, event_request("Dance Night", None))
        .await
        .expect("create second event");

    // another host cannot delete someone else's event
    let err = service
        .delete_event(other_host.id, Role::Host, event.id)
        .await
        .unwrap_err();
    assert_matches!(err, CommitteeHubError::PermissionDenied(_));

    // a student cannot delete at all
    let err = service
        .delete_event(other_host.id, Role::Student, event.id)
        .await
        .unwrap_err();
    assert_matches!(err, CommitteeHubError::PermissionDenied(_));

    let mut events_rx = notifications.subscribe();

    // the creating host deletes their own
    service
        .delete_event(host.id, Role::Host, event.id)
        .await
        .expect("host deletes own event");
    let err = service.get_event(event.id).await.unwrap_err();
    assert_matches!(err, CommitteeHubError::EventNotFound { .. });

    // deletion notified the listing views
    let notification = events_rx.recv().await.expect("notification");
    assert_matches!(
        notification,
        CommitteeHub::services::DomainEvent::EventDeleted { event_id } if event_id == event.id
    );

    // an admin deletes an event they never created
    service
        .delete_event(admin.id, Role::Admin, second.id)
        .await
        .expect("admin deletes any event");
}

#[tokio::test]
#[serial]
async fn test_registration_listing_restricted_to_creator_or_admin() {
    let db = TestDatabase::new().await.expect("test database");
    let (service, _) = event_service(&db);

    let (host, _) = db.seed_student("host@test.in", "password123", "Meera", "Joshi").await;
    let (other_host, _) = db.seed_student("other@test.in", "password123", "Ravi", "Iyer").await;
    let (student, profile) = db
        .seed_student("student@test.in", "password123", "Asha", "Rao")
        .await;

    let event = service
        .create_event(host.id, Role::Host, event_request("Tech Talk", None))
        .await
        .expect("create event");

    RegistrationRepository::new(db.pool.clone())
        .create(CommitteeHub::models::registration::CreateRegistrationRequest {
            event_id: event.id,
            user_id: student.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
        })
        .await
        .expect("seed registration");

    let err = service
        .registrations_for_event(other_host.id, Role::Host, event.id)
        .await
        .unwrap_err();
    assert_matches!(err, CommitteeHubError::PermissionDenied(_));

    let listed = service
        .registrations_for_event(host.id, Role::Host, event.id)
        .await
        .expect("creator lists registrations");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].registration.first_name, profile.first_name);
    assert!(listed[0].receipt.is_none(), "free event has no receipt");
}
