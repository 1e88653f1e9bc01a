//! Registration flow integration tests
//!
//! Drives the orchestrator end to end against containerized Postgres and
//! Redis with a wiremock gateway: free and paid registrations, retryable
//! reauthentication failures, and payment verification.

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use serial_test::serial;

use CommitteeHub::config::Settings;
use CommitteeHub::database::repositories::{
    AccountRepository, EventRepository, ProfileRepository, RegistrationRepository,
};
use CommitteeHub::models::event::Event;
use CommitteeHub::services::auth::ReauthProof;
use CommitteeHub::services::razorpay::PaymentCallback;
use CommitteeHub::services::{
    AuthService, DomainEvent, NotificationService, RazorpayService, RegistrationService,
};
use CommitteeHub::state::machine::FlowState;
use CommitteeHub::state::storage::FlowStorage;
use CommitteeHub::utils::errors::CommitteeHubError;

struct Stack {
    service: RegistrationService,
    notifications: NotificationService,
    settings: Settings,
}

async fn registration_stack(db: &TestDatabase, redis: &TestRedis, gateway_url: &str) -> Stack {
    let settings = test_settings(&db.database_url, &redis.url, gateway_url);
    let pool = db.pool.clone();

    let flow_storage = FlowStorage::new(settings.redis.clone())
        .await
        .expect("flow storage");
    let auth = AuthService::new(
        AccountRepository::new(pool.clone()),
        ProfileRepository::new(pool.clone()),
        settings.clone(),
    );
    let razorpay = RazorpayService::new(settings.clone()).expect("razorpay service");
    let notifications = NotificationService::default();

    let service = RegistrationService::new(
        EventRepository::new(pool.clone()),
        RegistrationRepository::new(pool.clone()),
        ProfileRepository::new(pool),
        auth,
        razorpay,
        flow_storage,
        notifications.clone(),
        settings.clone(),
    );

    Stack {
        service,
        notifications,
        settings,
    }
}

async fn seed_event(db: &TestDatabase, fee: Option<&str>) -> Event {
    let (host, _) = db
        .seed_student("host@test.in", "password123", "Meera", "Joshi")
        .await;
    EventRepository::new(db.pool.clone())
        .create(host.id, event_request("Tech Talk", fee))
        .await
        .expect("seed event")
}

#[tokio::test]
#[serial]
async fn test_free_event_reaches_success_without_pay() {
    let db = TestDatabase::new().await.expect("test database");
    let redis = TestRedis::new().await;
    let gateway = RazorpayMockServer::start().await;
    let stack = registration_stack(&db, &redis, &gateway.api_url()).await;

    let (student, profile) = db
        .seed_student("student@test.in", "password123", "Asha", "Rao")
        .await;
    let event = seed_event(&db, None).await;

    let flow = stack.service.begin(student.id, event.id).await.expect("begin");
    assert_matches!(&flow.state, FlowState::Confirm { event_name } if event_name == "Tech Talk");

    let flow = stack
        .service
        .confirm(student.id, event.id)
        .await
        .expect("confirm");
    assert_eq!(flow.state, FlowState::Reauthenticate);

    let mut events_rx = stack.notifications.subscribe();

    let flow = stack
        .service
        .reauthenticate(
            student.id,
            event.id,
            ReauthProof::Password {
                password: "password123".to_string(),
            },
        )
        .await
        .expect("reauthenticate");
    assert_eq!(flow.state, FlowState::Success, "free events skip Pay entirely");

    // the registration snapshot copies the profile's name fields
    let registration = RegistrationRepository::new(db.pool.clone())
        .find(event.id, student.id)
        .await
        .expect("registration query")
        .expect("registration present");
    assert_eq!(registration.first_name, profile.first_name);
    assert_eq!(registration.last_name, profile.last_name);
    assert_eq!(registration.email, profile.email);

    stack.service.close(student.id, event.id).await.expect("close");
    assert!(stack
        .service
        .current(student.id, event.id)
        .await
        .expect("current")
        .is_none());

    // closing Success publishes the refresh notification
    let notification = events_rx.recv().await.expect("notification");
    assert_eq!(
        notification,
        DomainEvent::RegistrationCompleted {
            event_id: event.id,
            user_id: student.id
        }
    );
}

#[tokio::test]
#[serial]
async fn test_non_numeric_fee_counts_as_free() {
    let db = TestDatabase::new().await.expect("test database");
    let redis = TestRedis::new().await;
    let gateway = RazorpayMockServer::start().await;
    let stack = registration_stack(&db, &redis, &gateway.api_url()).await;

    let (student, _) = db
        .seed_student("student@test.in", "password123", "Asha", "Rao")
        .await;
    let event = seed_event(&db, Some("not-a-number")).await;

    stack.service.begin(student.id, event.id).await.expect("begin");
    stack
        .service
        .confirm(student.id, event.id)
        .await
        .expect("confirm");
    let flow = stack
        .service
        .reauthenticate(
            student.id,
            event.id,
            ReauthProof::Password {
                password: "password123".to_string(),
            },
        )
        .await
        .expect("reauthenticate");

    assert_eq!(flow.state, FlowState::Success);
}

#[tokio::test]
#[serial]
async fn test_paid_event_charges_minor_units() {
    let db = TestDatabase::new().await.expect("test database");
    let redis = TestRedis::new().await;
    let gateway = RazorpayMockServer::start().await;
    gateway.mock_order_created("order_test123", 50000).await;
    let stack = registration_stack(&db, &redis, &gateway.api_url()).await;

    let (student, _) = db
        .seed_student("student@test.in", "password123", "Asha", "Rao")
        .await;
    let event = seed_event(&db, Some("500")).await;

    stack.service.begin(student.id, event.id).await.expect("begin");
    stack
        .service
        .confirm(student.id, event.id)
        .await
        .expect("confirm");
    let flow = stack
        .service
        .reauthenticate(
            student.id,
            event.id,
            ReauthProof::Password {
                password: "password123".to_string(),
            },
        )
        .await
        .expect("reauthenticate");

    // "500" rupees becomes 50000 paise, and an order is still pending
    assert_matches!(
        &flow.state,
        FlowState::Pay {
            amount_minor: 50000,
            order_id: None,
            ..
        }
    );

    let (flow, order) = stack
        .service
        .create_order(student.id, event.id)
        .await
        .expect("create order");
    assert_eq!(order.amount, 50000);
    assert_matches!(
        &flow.state,
        FlowState::Pay { order_id: Some(id), .. } if id == "order_test123"
    );

    let signature = gateway_signature(
        "order_test123",
        "pay_test456",
        &stack.settings.razorpay.key_secret,
    );
    let flow = stack
        .service
        .complete_payment(
            student.id,
            event.id,
            PaymentCallback {
                razorpay_order_id: "order_test123".to_string(),
                razorpay_payment_id: "pay_test456".to_string(),
                razorpay_signature: signature.clone(),
            },
        )
        .await
        .expect("complete payment");
    assert_eq!(flow.state, FlowState::Success);

    // the receipt is keyed by the gateway payment id
    let receipt = RegistrationRepository::new(db.pool.clone())
        .find_receipt("pay_test456")
        .await
        .expect("receipt query")
        .expect("receipt present");
    assert_eq!(receipt.event_id, event.id);
    assert_eq!(receipt.user_id, student.id);
    assert_eq!(receipt.order_id, "order_test123");
    assert_eq!(receipt.signature, signature);

    stack.service.close(student.id, event.id).await.expect("close");
}

#[tokio::test]
#[serial]
async fn test_failed_reauthentication_is_retryable() {
    let db = TestDatabase::new().await.expect("test database");
    let redis = TestRedis::new().await;
    let gateway = RazorpayMockServer::start().await;
    let stack = registration_stack(&db, &redis, &gateway.api_url()).await;

    let (student, _) = db
        .seed_student("student@test.in", "password123", "Asha", "Rao")
        .await;
    let event = seed_event(&db, None).await;

    stack.service.begin(student.id, event.id).await.expect("begin");
    stack
        .service
        .confirm(student.id, event.id)
        .await
        .expect("confirm");

    let err = stack
        .service
        .reauthenticate(
            student.id,
            event.id,
            ReauthProof::Password {
                password: "wrong-password".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, CommitteeHubError::Reauthentication(_));

    // the flow stays on the same step and no registration was written
    let flow = stack
        .service
        .current(student.id, event.id)
        .await
        .expect("current")
        .expect("flow still present");
    assert_eq!(flow.state, FlowState::Reauthenticate);
    assert!(RegistrationRepository::new(db.pool.clone())
        .find(event.id, student.id)
        .await
        .expect("registration query")
        .is_none());

    // the retry with the right password goes through
    let flow = stack
        .service
        .reauthenticate(
            student.id,
            event.id,
            ReauthProof::Password {
                password: "password123".to_string(),
            },
        )
        .await
        .expect("retry reauthenticate");
    assert_eq!(flow.state, FlowState::Success);
}

#[tokio::test]
#[serial]
async fn test_tampered_signature_keeps_flow_in_pay() {
    let db = TestDatabase::new().await.expect("test database");
    let redis = TestRedis::new().await;
    let gateway = RazorpayMockServer::start().await;
    gateway.mock_order_created("order_test123", 50000).await;
    let stack = registration_stack(&db, &redis, &gateway.api_url()).await;

    let (student, _) = db
        .seed_student("student@test.in", "password123", "Asha", "Rao")
        .await;
    let event = seed_event(&db, Some("500")).await;

    stack.service.begin(student.id, event.id).await.expect("begin");
    stack
        .service
        .confirm(student.id, event.id)
        .await
        .expect("confirm");
    stack
        .service
        .reauthenticate(
            student.id,
            event.id,
            ReauthProof::Password {
                password: "password123".to_string(),
            },
        )
        .await
        .expect("reauthenticate");
    stack
        .service
        .create_order(student.id, event.id)
        .await
        .expect("create order");

    let err = stack
        .service
        .complete_payment(
            student.id,
            event.id,
            PaymentCallback {
                razorpay_order_id: "order_test123".to_string(),
                razorpay_payment_id: "pay_test456".to_string(),
                razorpay_signature: "deadbeef".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, CommitteeHubError::Razorpay(_));

    // still in Pay, and no receipt was written
    let flow = stack
        .service
        .current(student.id, event.id)
        .await
        .expect("current")
        .expect("flow still present");
    assert_matches!(&flow.state, FlowState::Pay { .. });
    assert!(RegistrationRepository::new(db.pool.clone())
        .find_receipt("pay_test456")
        .await
        .expect("receipt query")
        .is_none());
}

#[tokio::test]
#[serial]
async fn test_begin_refused_when_already_registered() {
    let db = TestDatabase::new().await.expect("test database");
    let redis = TestRedis::new().await;
    let gateway = RazorpayMockServer::start().await;
    let stack = registration_stack(&db, &redis, &gateway.api_url()).await;

    let (student, _) = db
        .seed_student("student@test.in", "password123", "Asha", "Rao")
        .await;
    let event = seed_event(&db, None).await;

    stack.service.begin(student.id, event.id).await.expect("begin");
    stack
        .service
        .confirm(student.id, event.id)
        .await
        .expect("confirm");
    stack
        .service
        .reauthenticate(
            student.id,
            event.id,
            ReauthProof::Password {
                password: "password123".to_string(),
            },
        )
        .await
        .expect("reauthenticate");
    stack.service.close(student.id, event.id).await.expect("close");

    let err = stack.service.begin(student.id, event.id).await.unwrap_err();
    assert_matches!(err, CommitteeHubError::InvalidInput(_));
}

#[tokio::test]
#[serial]
async fn test_close_requires_terminal_state() {
    let db = TestDatabase::new().await.expect("test database");
    let redis = TestRedis::new().await;
    let gateway = RazorpayMockServer::start().await;
    let stack = registration_stack(&db, &redis, &gateway.api_url()).await;

    let (student, _) = db
        .seed_student("student@test.in", "password123", "Asha", "Rao")
        .await;
    let event = seed_event(&db, None).await;

    stack.service.begin(student.id, event.id).await.expect("begin");

    let err = stack.service.close(student.id, event.id).await.unwrap_err();
    assert_matches!(err, CommitteeHubError::InvalidStateTransition { .. });
}
