//! Due-reminder delivery.
//!
//! Send-then-delete: a reminder is removed only after its notification
//! went out, so a crash or send failure leaves it in place for the next
//! tick. Delivery is therefore at-least-once; the delete doubles as the
//! claim that stops a second delivery.

use chrono::NaiveDateTime;
use remi_core::{
    message::OutgoingMessage,
    traits::{Channel, ReminderStore},
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Background task: periodically scan for due reminders and deliver them.
///
/// Ticks are serialized; a slow scan delays the next tick instead of
/// overlapping with it.
pub(super) async fn scheduler_loop(
    store: Arc<dyn ReminderStore>,
    channel: Arc<dyn Channel>,
    poll_secs: u64,
) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(poll_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so startup isn't a scan.
    interval.tick().await;

    loop {
        interval.tick().await;
        let now = chrono::Local::now().naive_local();
        if let Err(e) = deliver_due(store.as_ref(), channel.as_ref(), now).await {
            error!("scheduler: scan failed: {e}");
        }
    }
}

/// Deliver every reminder due at `now`. Returns the number delivered.
///
/// Failures are isolated per reminder: one failed send leaves that
/// reminder in place and moves on to the next.
pub(super) async fn deliver_due(
    store: &dyn ReminderStore,
    channel: &dyn Channel,
    now: NaiveDateTime,
) -> Result<usize, remi_core::error::RemiError> {
    let mut delivered = 0;

    for reminder in store.list_all().await? {
        if !reminder.is_due(now) {
            continue;
        }

        let msg = OutgoingMessage {
            text: format!("Reminder: {}", reminder.text),
            reply_target: Some(reminder.owner.clone()),
        };

        if let Err(e) = channel.send(msg).await {
            error!(
                "failed to deliver reminder {} to {}: {e}",
                reminder.id, reminder.owner
            );
            continue;
        }

        // Send succeeded; spend the claim.
        match store.delete_if_present(&reminder.id).await {
            Ok(true) => {
                info!("delivered reminder {}: {}", reminder.id, reminder.text);
                delivered += 1;
            }
            Ok(false) => {
                // Another deliverer got here first; the duplicate send
                // already happened, which at-least-once allows.
                warn!("reminder {} was already claimed", reminder.id);
            }
            Err(e) => {
                error!("failed to delete reminder {}: {e}", reminder.id);
            }
        }
    }

    Ok(delivered)
}
