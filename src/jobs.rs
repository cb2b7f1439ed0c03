//! Background notification jobs
//!
//! The core never talks to a scheduler directly: it submits jobs through
//! `JobQueue` and a worker task drains them into the notification
//! service. Jobs are attempted once, immediately, with no retries; the
//! queue only guarantees that a submitted job is eventually picked up.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{
    error::{AppError, AppResult},
    services::notifications::NotificationsService,
};

/// A unit of notification work, identified by a loan id (or none, for
/// the sweep)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationJob {
    /// Notice that a loan was just created
    LoanCreated(i32),
    /// On-demand reminder for a single loan
    Reminder(i32),
    /// Batch pass over all active loans for overdue ones
    OverdueSweep,
}

/// Submission side of the notification queue
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<NotificationJob>,
}

impl JobQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn submit(&self, job: NotificationJob) -> AppResult<()> {
        self.tx
            .send(job)
            .map_err(|_| AppError::Internal("Notification queue is closed".to_string()))
    }
}

/// Spawn the worker that executes queued notification jobs
pub fn spawn_worker(
    mut rx: mpsc::UnboundedReceiver<NotificationJob>,
    notifications: NotificationsService,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            tracing::debug!(?job, "Running notification job");

            let result = match job {
                NotificationJob::LoanCreated(loan_id) => notifications
                    .notify_loan_created(loan_id)
                    .await
                    .map(|_| ()),
                NotificationJob::Reminder(loan_id) => {
                    notifications.send_reminder(loan_id).await.map(|_| ())
                }
                NotificationJob::OverdueSweep => {
                    notifications.sweep_overdue().await.map(|_| ())
                }
            };

            if let Err(e) = result {
                tracing::error!(?job, "Notification job failed: {}", e);
            }
        }

        tracing::info!("Notification queue closed, worker stopping");
    })
}

/// Spawn the timer that submits a periodic overdue sweep
pub fn spawn_sweep_timer(queue: JobQueue, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the sweep should not run
        // at startup, so consume it
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if queue.submit(NotificationJob::OverdueSweep).is_err() {
                tracing::info!("Notification queue closed, sweep timer stopping");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_and_receive() {
        let (queue, mut rx) = JobQueue::new();

        queue.submit(NotificationJob::LoanCreated(7)).unwrap();
        queue.submit(NotificationJob::OverdueSweep).unwrap();

        assert_eq!(rx.recv().await, Some(NotificationJob::LoanCreated(7)));
        assert_eq!(rx.recv().await, Some(NotificationJob::OverdueSweep));
    }

    #[tokio::test]
    async fn test_submit_after_receiver_dropped() {
        let (queue, rx) = JobQueue::new();
        drop(rx);

        assert!(queue.submit(NotificationJob::Reminder(1)).is_err());
    }
}
