//! Consumer-binding tests driven through the event-bus dispatch seam, so
//! no broker is required.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use event_bus::EventConsumer;
use notification_service::{Mailer, NotificationStats, PassportEventHandlers};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct MockMailer {
    sent: Mutex<Vec<(String, String, String)>>,
    fail: AtomicBool,
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("smtp refused");
        }
        self.sent
            .lock()
            .await
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

fn setup() -> (Arc<MockMailer>, Arc<NotificationStats>, EventConsumer) {
    let mailer = Arc::new(MockMailer::default());
    let stats = Arc::new(NotificationStats::default());
    let handlers = Arc::new(PassportEventHandlers::new(
        mailer.clone() as Arc<dyn Mailer>,
        "admin@batterypassport.com".to_string(),
        stats.clone(),
    ));

    let mut consumer = EventConsumer::new("localhost:9092", "battery-passport-group");
    handlers.register(&mut consumer);

    (mailer, stats, consumer)
}

fn created_payload(identifier: &str, actor: &str) -> serde_json::Value {
    json!({
        "passportId": Uuid::new_v4(),
        "batteryIdentifier": identifier,
        "createdBy": actor,
        "timestamp": "2026-08-25T12:00:00Z",
    })
}

#[tokio::test]
async fn created_event_sends_one_email_with_event_fields() {
    let (mailer, stats, consumer) = setup();

    consumer
        .dispatch("passport.created", created_payload("BATT-001", "u1"))
        .await;

    let sent = mailer.sent.lock().await;
    assert_eq!(sent.len(), 1);

    let (to, subject, body) = &sent[0];
    assert_eq!(to, "admin@batterypassport.com");
    assert_eq!(subject, "New Battery Passport Created");
    assert!(body.contains("Battery Identifier: BATT-001"));
    assert!(body.contains("Created By: u1"));
    assert_eq!(stats.delivered(), 1);
    assert_eq!(stats.failed(), 0);
}

#[tokio::test]
async fn each_lifecycle_topic_has_its_own_handler() {
    let (mailer, _, consumer) = setup();

    consumer
        .dispatch("passport.created", created_payload("BATT-001", "u1"))
        .await;
    consumer
        .dispatch(
            "passport.updated",
            json!({
                "passportId": Uuid::new_v4(),
                "batteryIdentifier": "BATT-001",
                "updatedBy": "u2",
                "timestamp": "2026-08-25T12:01:00Z",
            }),
        )
        .await;
    consumer
        .dispatch(
            "passport.deleted",
            json!({
                "passportId": Uuid::new_v4(),
                "batteryIdentifier": "BATT-001",
                "deletedBy": "u3",
                "timestamp": "2026-08-25T12:02:00Z",
            }),
        )
        .await;

    let subjects: Vec<String> = mailer
        .sent
        .lock()
        .await
        .iter()
        .map(|(_, subject, _)| subject.clone())
        .collect();
    assert_eq!(
        subjects,
        vec![
            "New Battery Passport Created",
            "Battery Passport Updated",
            "Battery Passport Deleted",
        ]
    );
}

#[tokio::test]
async fn failed_side_effect_is_counted_and_does_not_stall_the_loop() {
    let (mailer, stats, consumer) = setup();

    mailer.fail.store(true, Ordering::SeqCst);
    consumer
        .dispatch("passport.created", created_payload("BATT-001", "u1"))
        .await;

    mailer.fail.store(false, Ordering::SeqCst);
    consumer
        .dispatch("passport.created", created_payload("BATT-002", "u1"))
        .await;

    // The failed message is not redelivered; the next one goes through.
    let sent = mailer.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].2.contains("BATT-002"));
    assert_eq!(stats.delivered(), 1);
    assert_eq!(stats.failed(), 1);
}

#[tokio::test]
async fn undecodable_payload_is_skipped_without_email() {
    let (mailer, stats, consumer) = setup();

    consumer
        .dispatch("passport.created", json!({"unexpected": "shape"}))
        .await;
    consumer
        .dispatch("passport.created", created_payload("BATT-003", "u1"))
        .await;

    assert_eq!(mailer.sent.lock().await.len(), 1);
    // A decode failure never reaches the mail path, so neither counter moves.
    assert_eq!(stats.delivered(), 1);
    assert_eq!(stats.failed(), 0);
}
