//! Notification service for the battery passport platform.
//!
//! Subscribes to the passport lifecycle topics at startup and turns each
//! received event into an email to the operations address. Delivery is
//! best effort: a failed side effect is logged and never redelivered.

pub mod config;
pub mod events;
pub mod handlers;
pub mod mailer;

pub use events::{NotificationStats, PassportEventHandlers};
pub use mailer::{LogMailer, Mailer, SmtpMailer};
