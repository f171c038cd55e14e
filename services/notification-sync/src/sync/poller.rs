// Poller untuk unread feed
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use super::NotificationSync;

/// Status visibility host page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Visibility::Hidden)
    }
}

/// Loop polling sampai task di-abort saat unmount.
///
/// Tick pertama langsung jalan (fetch awal setelah mount). Tick saat page
/// hidden dilewati; page yang kembali visible diperlakukan seperti focus.
pub(super) async fn run(sync: NotificationSync, mut visibility: watch::Receiver<Visibility>) {
    let mut ticker = interval(sync.config().poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "🔄 Polling unread notifications every {}s",
        sync.config().poll_interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if visibility.borrow().is_hidden() {
                    tracing::debug!("Page hidden, skip polling tick");
                    continue;
                }
                match sync.fetch_unread_feed().await {
                    Ok(0) => {}
                    Ok(dispatched) => tracing::debug!("Dispatched {} alerts", dispatched),
                    Err(e) => tracing::warn!("⚠️ Polling cycle gagal: {}", e),
                }
            }
            _ = sync.inner.focus.notified() => {
                sync.on_focus_regained().await;
            }
            changed = visibility.changed() => {
                if changed.is_err() {
                    break;
                }
                let now_visible = !visibility.borrow_and_update().is_hidden();
                if now_visible {
                    sync.on_focus_regained().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::scripted;
    use crate::domain::feed::fixtures::{snapshot, unread};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_polls_immediately_then_every_interval() {
        let (api, sync, _board) = scripted();
        api.push_unread(Ok(snapshot(vec![unread("A")], 1)));

        sync.mount().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(api.unread_fetches(), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.unread_fetches(), 2);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(api.unread_fetches(), 3);

        // On-demand feed tidak pernah disentuh timer
        assert_eq!(api.all_fetches(), 0);
        sync.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_page_is_not_polled() {
        let (api, sync, _board) = scripted();
        sync.set_hidden(true);
        sync.mount().await;

        tokio::time::sleep(Duration::from_secs(185)).await;
        assert_eq!(api.unread_fetches(), 0);

        // Kembali visible: langsung refetch
        sync.set_hidden(false);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(api.unread_fetches(), 1);
        sync.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_triggers_extra_poll() {
        let (api, sync, _board) = scripted();
        sync.mount().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(api.unread_fetches(), 1);

        sync.focus_regained();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(api.unread_fetches(), 2);
        sync.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_stops_polling() {
        let (api, sync, _board) = scripted();
        sync.mount().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        sync.unmount().await;

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(api.unread_fetches(), 1);
        assert!(!sync.is_mounted().await);
    }
}
