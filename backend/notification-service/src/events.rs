use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use event_bus::{topics, EventConsumer, PassportCreated, PassportDeleted, PassportUpdated};
use serde_json::Value;
use tracing::{error, info};

use crate::mailer::Mailer;

/// Process-lifetime delivery counters, exposed by the stats endpoint.
#[derive(Default)]
pub struct NotificationStats {
    pub delivered: AtomicU64,
    pub failed: AtomicU64,
}

impl NotificationStats {
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Consumer bindings for the passport lifecycle topics.
///
/// Each handler catches and logs its own mail failure, layered on top of
/// the consumer loop's catch, so one failing side effect never prevents
/// the process from receiving subsequent messages. An undecodable payload
/// propagates to the loop instead and is skipped there.
pub struct PassportEventHandlers {
    mailer: Arc<dyn Mailer>,
    admin_email: String,
    stats: Arc<NotificationStats>,
}

impl PassportEventHandlers {
    pub fn new(mailer: Arc<dyn Mailer>, admin_email: String, stats: Arc<NotificationStats>) -> Self {
        Self {
            mailer,
            admin_email,
            stats,
        }
    }

    /// Binds one handler per lifecycle topic on `consumer`.
    pub fn register(self: &Arc<Self>, consumer: &mut EventConsumer) {
        let this = Arc::clone(self);
        consumer.subscribe(topics::PASSPORT_CREATED, move |payload| {
            let this = Arc::clone(&this);
            async move { this.on_created(payload).await }
        });

        let this = Arc::clone(self);
        consumer.subscribe(topics::PASSPORT_UPDATED, move |payload| {
            let this = Arc::clone(&this);
            async move { this.on_updated(payload).await }
        });

        let this = Arc::clone(self);
        consumer.subscribe(topics::PASSPORT_DELETED, move |payload| {
            let this = Arc::clone(&this);
            async move { this.on_deleted(payload).await }
        });
    }

    pub async fn on_created(&self, payload: Value) -> anyhow::Result<()> {
        let event: PassportCreated = serde_json::from_value(payload)?;
        info!(battery_identifier = %event.battery_identifier, "handling passport.created");

        let subject = "New Battery Passport Created";
        let body = format!(
            "A new battery passport has been created.\n\n\
             Battery Identifier: {}\n\
             Created By: {}\n\
             Created At: {}\n\n\
             This is an automated notification from the Battery Passport System.",
            event.battery_identifier, event.created_by, event.timestamp
        );

        self.deliver(subject, &body).await;
        Ok(())
    }

    pub async fn on_updated(&self, payload: Value) -> anyhow::Result<()> {
        let event: PassportUpdated = serde_json::from_value(payload)?;
        info!(battery_identifier = %event.battery_identifier, "handling passport.updated");

        let subject = "Battery Passport Updated";
        let body = format!(
            "A battery passport has been updated.\n\n\
             Battery Identifier: {}\n\
             Updated By: {}\n\
             Updated At: {}\n\n\
             This is an automated notification from the Battery Passport System.",
            event.battery_identifier, event.updated_by, event.timestamp
        );

        self.deliver(subject, &body).await;
        Ok(())
    }

    pub async fn on_deleted(&self, payload: Value) -> anyhow::Result<()> {
        let event: PassportDeleted = serde_json::from_value(payload)?;
        info!(battery_identifier = %event.battery_identifier, "handling passport.deleted");

        let subject = "Battery Passport Deleted";
        let body = format!(
            "A battery passport has been deleted.\n\n\
             Battery Identifier: {}\n\
             Deleted By: {}\n\
             Deleted At: {}\n\n\
             This is an automated notification from the Battery Passport System.",
            event.battery_identifier, event.deleted_by, event.timestamp
        );

        self.deliver(subject, &body).await;
        Ok(())
    }

    async fn deliver(&self, subject: &str, body: &str) {
        match self.mailer.send(&self.admin_email, subject, body).await {
            Ok(()) => {
                self.stats.delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                error!(error = %e, subject, "failed to send notification email");
            }
        }
    }
}
