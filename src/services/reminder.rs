//! Background reminder scanner. Once a minute it loads every habit with a
//! reminder time and emails the owner when the configured HH:MM equals the
//! current local wall-clock minute. The scheduler is an owned handle with
//! an explicit start/stop lifecycle so shutdown can drain it cleanly.

use crate::{
    config::reminder::ReminderConfig,
    models::{habit, user, Habit, User},
    services::email::EmailService,
    utils::time,
};
use chrono::Timelike;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct ReminderScheduler {
    db: DatabaseConnection,
    email_service: EmailService,
    config: ReminderConfig,
}

/// Handle returned by [`ReminderScheduler::start`]. Dropping it without
/// calling [`stop`](ReminderHandle::stop) leaves the task running.
pub struct ReminderHandle {
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl ReminderHandle {
    /// Signal the scan loop to exit and wait for the in-flight scan to
    /// finish.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("Reminder task did not shut down cleanly: {e}");
        }
    }
}

impl ReminderScheduler {
    pub fn new(db: DatabaseConnection, email_service: EmailService, config: ReminderConfig) -> Self {
        Self {
            db,
            email_service,
            config,
        }
    }

    /// Spawn the scan loop. The first tick fires immediately; ticks missed
    /// while a scan is running are coalesced.
    pub fn start(self) -> ReminderHandle {
        let cancel = CancellationToken::new();
        let child = cancel.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.config.interval_seconds));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::info!(
                interval_seconds = self.config.interval_seconds,
                "Reminder scheduler started"
            );

            loop {
                tokio::select! {
                    _ = child.cancelled() => {
                        tracing::info!("Reminder scheduler stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = self.scan_once().await {
                            tracing::error!("Reminder scan failed: {e}");
                        }
                    }
                }
            }
        });

        ReminderHandle { cancel, task }
    }

    /// One pass over all habits with a reminder time. A failure for one
    /// habit is logged and never blocks the rest of the pass.
    async fn scan_once(&self) -> Result<(), sea_orm::DbErr> {
        let now = time::local_now(self.config.utc_offset_minutes);
        let current = (now.hour(), now.minute());

        let habits = Habit::find()
            .filter(habit::Column::ReminderTime.is_not_null())
            .all(&self.db)
            .await?;

        let mut sent = 0usize;
        for habit in &habits {
            let Some(reminder) = habit.reminder_time.as_deref() else {
                continue;
            };
            let Some(target) = time::parse_hhmm(reminder) else {
                tracing::warn!(
                    habit_id = habit.id,
                    reminder_time = reminder,
                    "Skipping habit with malformed reminder time"
                );
                continue;
            };
            if target != current {
                continue;
            }

            let owner = User::find_by_id(habit.user_id)
                .filter(user::Column::IsVerified.eq(true))
                .one(&self.db)
                .await?;
            let Some(owner) = owner else {
                continue;
            };

            match self
                .email_service
                .send_reminder_email(&owner.email, &owner.first_name, &habit.title)
                .await
            {
                Ok(()) => {
                    sent += 1;
                    tracing::info!(
                        habit_id = habit.id,
                        user_id = owner.id,
                        "Reminder sent for \"{}\"",
                        habit.title
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        habit_id = habit.id,
                        user_id = owner.id,
                        "Failed to send reminder: {e}"
                    );
                }
            }
        }

        if sent > 0 {
            tracing::info!(sent, scanned = habits.len(), "Reminder scan complete");
        }

        Ok(())
    }
}
