// Alert dispatcher dan alert board in-memory
use shared::models::Notification;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::Alert;

/// Maksimum alert yang disimpan board sekaligus
const MAX_ACTIVE_ALERTS: usize = 50;

/// General-purpose alert surface. `show` harus non-blocking.
pub trait AlertSink: Send + Sync {
    fn show(&self, alert: Alert);
}

/// Ubah notifikasi baru menjadi alert transient
pub struct AlertDispatcher {
    sink: Arc<dyn AlertSink>,
    duration: Duration,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn AlertSink>, duration: Duration) -> Self {
        Self { sink, duration }
    }

    /// Satu alert per notifikasi, return jumlah alert yang dikirim
    pub fn dispatch(&self, novel: &[Notification]) -> usize {
        for notification in novel {
            let alert = Alert::from_notification(notification, self.duration);
            tracing::info!(
                "🔔 New notification {} ({:?}): {}",
                alert.notification_id,
                alert.severity,
                alert.title
            );
            self.sink.show(alert);
        }
        novel.len()
    }
}

/// Alert surface in-process: alert hilang sendiri setelah durasinya habis
#[derive(Debug, Default)]
pub struct AlertBoard {
    alerts: Mutex<VecDeque<(Alert, Instant)>>,
}

impl AlertBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alert yang belum expired, paling baru di depan
    pub fn active(&self) -> Vec<Alert> {
        let now = Instant::now();
        match self.alerts.lock() {
            Ok(mut alerts) => {
                alerts.retain(|(alert, shown_at)| now.duration_since(*shown_at) < alert.duration());
                alerts.iter().map(|(alert, _)| alert.clone()).collect()
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn dismiss(&self, id: uuid::Uuid) -> bool {
        let Ok(mut alerts) = self.alerts.lock() else {
            return false;
        };
        let before = alerts.len();
        alerts.retain(|(alert, _)| alert.id != id);
        alerts.len() < before
    }
}

impl AlertSink for AlertBoard {
    fn show(&self, alert: Alert) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push_front((alert, Instant::now()));
            alerts.truncate(MAX_ACTIVE_ALERTS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feed::fixtures::notification;
    use crate::domain::{AlertSeverity, DEFAULT_ALERT_DURATION};
    use shared::models::NotificationType;

    #[derive(Default)]
    struct RecordingSink {
        shown: Mutex<Vec<Alert>>,
    }

    impl AlertSink for RecordingSink {
        fn show(&self, alert: Alert) {
            self.shown.lock().unwrap().push(alert);
        }
    }

    #[test]
    fn test_dispatch_one_alert_per_novel_item() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = AlertDispatcher::new(sink.clone(), DEFAULT_ALERT_DURATION);

        let novel = vec![
            notification("a", NotificationType::LeaveApproved),
            notification("b", NotificationType::LeaveRejected),
            notification("c", NotificationType::LeaveRequest),
        ];
        assert_eq!(dispatcher.dispatch(&novel), 3);

        let shown = sink.shown.lock().unwrap();
        let summary: Vec<(&str, AlertSeverity, u64)> = shown
            .iter()
            .map(|a| (a.notification_id.as_str(), a.severity, a.duration_ms))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a", AlertSeverity::Success, 8000),
                ("b", AlertSeverity::Warning, 8000),
                ("c", AlertSeverity::Info, 8000),
            ]
        );
    }

    #[test]
    fn test_dispatch_nothing_for_empty_novelty() {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = AlertDispatcher::new(sink.clone(), DEFAULT_ALERT_DURATION);
        assert_eq!(dispatcher.dispatch(&[]), 0);
        assert!(sink.shown.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_board_expires_alerts_after_duration() {
        let board = AlertBoard::new();
        board.show(Alert::from_notification(
            &notification("a", NotificationType::Info),
            DEFAULT_ALERT_DURATION,
        ));

        tokio::time::advance(Duration::from_millis(7999)).await;
        assert_eq!(board.active().len(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(board.active().is_empty());
    }

    #[test]
    fn test_board_newest_first_and_dismiss() {
        let board = AlertBoard::new();
        let first = Alert::from_notification(&notification("a", NotificationType::Info), DEFAULT_ALERT_DURATION);
        let second = Alert::from_notification(&notification("b", NotificationType::Info), DEFAULT_ALERT_DURATION);
        let first_id = first.id;
        board.show(first);
        board.show(second);

        let active = board.active();
        assert_eq!(active[0].notification_id, "b");
        assert_eq!(active[1].notification_id, "a");

        assert!(board.dismiss(first_id));
        assert!(!board.dismiss(first_id));
        assert_eq!(board.active().len(), 1);
    }
}
