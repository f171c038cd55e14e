// Fetch client: unread feed (polling) dan all feed (on-demand)
use super::store::FetchOutcome;
use super::NotificationSync;
use crate::domain::{FeedKind, FeedQuery, FeedSnapshot};
use crate::error::{AppError, AppResult};

impl NotificationSync {
    fn query_for(&self, kind: FeedKind) -> FeedQuery {
        match kind {
            FeedKind::Polling => FeedQuery::polling(self.config().poll_page_size),
            FeedKind::OnDemand => FeedQuery::on_demand(self.config().all_page_size),
        }
    }

    /// Fetch satu feed lalu pasang hasilnya di store.
    ///
    /// Error fetch tidak menyentuh snapshot lama, hanya mengisi error flag.
    async fn fetch_into_store(&self, kind: FeedKind) -> AppResult<FetchOutcome> {
        let store = self.store();
        let ticket = store.begin_fetch(kind).await.ok_or(AppError::Unmounted)?;

        let result: Result<FeedSnapshot, _> = self.inner.api.fetch_feed(self.query_for(kind)).await;

        match result {
            Ok(snapshot) => match store.complete_fetch(ticket, snapshot).await {
                FetchOutcome::Unmounted => Err(AppError::Unmounted),
                outcome => Ok(outcome),
            },
            Err(err) => {
                tracing::warn!("⚠️ Failed to fetch {} feed: {}", kind.as_str(), err);
                store.fail_fetch(ticket, err.to_string()).await;
                Err(AppError::Upstream(err))
            }
        }
    }

    /// Satu polling cycle: fetch unread feed, diff, kirim alert.
    /// Return jumlah alert yang di-dispatch.
    pub async fn fetch_unread_feed(&self) -> AppResult<usize> {
        match self.fetch_into_store(FeedKind::Polling).await? {
            FetchOutcome::Applied { novel } => Ok(self.inner.dispatcher.dispatch(&novel)),
            _ => Ok(0),
        }
    }

    /// Fetch feed lengkap. Hanya dipanggil atas permintaan user.
    pub async fn refetch_all_notifications(&self) -> AppResult<()> {
        self.fetch_into_store(FeedKind::OnDemand).await?;
        Ok(())
    }

    /// Reaksi saat window dapat fokus lagi (atau page kembali visible)
    pub(crate) async fn on_focus_regained(&self) {
        if self.visibility().is_hidden() {
            return;
        }

        if let Err(e) = self.fetch_unread_feed().await {
            tracing::debug!("Focus refetch unread feed gagal: {}", e);
        }

        // Feed on-demand hanya di-refresh kalau pernah dibuka dan sudah stale
        let store = self.store();
        let stale_after = self.config().all_feed_stale_after;
        if store.has_snapshot(FeedKind::OnDemand).await
            && !store.is_fresh(FeedKind::OnDemand, stale_after).await
        {
            if let Err(e) = self.refetch_all_notifications().await {
                tracing::debug!("Focus refetch all feed gagal: {}", e);
            }
        }
    }
}
