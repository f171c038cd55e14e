// Read-state mutator: remote write dulu, baru patch kedua cache
use super::store::PatchOutcome;
use super::NotificationSync;
use crate::error::{AppError, AppResult};

// Id dipakai sebagai path segment di remote API
fn validate_notification_id(id: &str) -> AppResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::bad_request("Notification id tidak boleh kosong"));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
    {
        return Err(AppError::bad_request(format!(
            "Notification id tidak valid: {}",
            id
        )));
    }
    Ok(id)
}

fn patch_result(outcome: PatchOutcome) -> AppResult<()> {
    match outcome {
        PatchOutcome::Unmounted => Err(AppError::Unmounted),
        PatchOutcome::Changed | PatchOutcome::Unchanged => Ok(()),
    }
}

impl NotificationSync {
    /// Tandai satu notifikasi sebagai dibaca.
    ///
    /// Kalau remote write gagal, cache tidak disentuh dan error dikembalikan.
    pub async fn mark_as_read(&self, id: &str) -> AppResult<()> {
        let id = validate_notification_id(id)?;
        let store = self.store();
        let epoch = store.begin_mutation().await.ok_or(AppError::Unmounted)?;

        if let Err(err) = self.inner.api.mark_as_read(id).await {
            tracing::warn!("⚠️ Failed to mark notification {} as read: {}", id, err);
            return Err(AppError::Upstream(err));
        }

        let outcome = store.apply_mark_read(epoch, id).await;
        tracing::debug!("Mark {} as read: {:?}", id, outcome);
        patch_result(outcome)
    }

    /// Tandai semua notifikasi sebagai dibaca
    pub async fn mark_all_as_read(&self) -> AppResult<()> {
        let store = self.store();
        let epoch = store.begin_mutation().await.ok_or(AppError::Unmounted)?;

        if let Err(err) = self.inner.api.mark_all_as_read().await {
            tracing::warn!("⚠️ Failed to mark all notifications as read: {}", err);
            return Err(AppError::Upstream(err));
        }

        let outcome = store.apply_mark_all_read(epoch).await;
        tracing::debug!("Mark all as read: {:?}", outcome);
        patch_result(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{engine, scripted};
    use super::*;
    use crate::domain::feed::fixtures::{read, snapshot, unread};
    use crate::domain::{FeedKind, FeedQuery, FeedSnapshot};
    use crate::repositories::{MockNotificationApi, NotificationApi};
    use shared::utils::http_client::HttpClientError;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[test]
    fn test_validate_notification_id() {
        assert_eq!(validate_notification_id(" abc-1 ").unwrap(), "abc-1");
        assert!(validate_notification_id("").is_err());
        assert!(validate_notification_id("a/../b").is_err());
        assert!(validate_notification_id("a?b").is_err());
    }

    #[tokio::test]
    async fn test_mark_as_read_patches_both_caches() {
        let (api, sync, _board) = scripted();
        sync.store().mount().await;

        api.push_unread(Ok(snapshot(vec![unread("A"), unread("B")], 2)));
        api.push_all(Ok(snapshot(vec![unread("B"), read("Z")], 2)));
        sync.fetch_unread_feed().await.unwrap();
        sync.refetch_all_notifications().await.unwrap();

        sync.mark_as_read("B").await.unwrap();

        let polling = sync.store().snapshot(FeedKind::Polling).await.unwrap();
        let on_demand = sync.store().snapshot(FeedKind::OnDemand).await.unwrap();
        assert!(!polling.is_unread("B"));
        assert!(!on_demand.is_unread("B"));
        assert_eq!(polling.unread_count, 1);
        assert_eq!(on_demand.unread_count, 1);

        // Kedua kalinya tetap dikirim ke remote tapi tidak mengubah count
        sync.mark_as_read("B").await.unwrap();
        assert_eq!(sync.unread_count().await, 1);
        assert_eq!(
            sync.store().snapshot(FeedKind::OnDemand).await.unwrap().unread_count,
            1
        );
        assert_eq!(*api.read_calls.lock().unwrap(), vec!["B", "B"]);
    }

    #[tokio::test]
    async fn test_mark_as_read_failure_leaves_caches_untouched() {
        let (api, sync, _board) = scripted();
        sync.store().mount().await;
        api.push_unread(Ok(snapshot(vec![unread("A")], 1)));
        sync.fetch_unread_feed().await.unwrap();

        api.fail_writes.store(true, Ordering::SeqCst);
        let before = sync.store().snapshot(FeedKind::Polling).await;

        let err = sync.mark_as_read("A").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(sync.store().snapshot(FeedKind::Polling).await, before);
        assert_eq!(sync.unread_count().await, 1);
    }

    #[tokio::test]
    async fn test_mark_all_as_read_success_and_failure() {
        let (api, sync, _board) = scripted();
        sync.store().mount().await;
        api.push_unread(Ok(snapshot(vec![unread("A"), unread("B")], 2)));
        api.push_all(Ok(snapshot(vec![unread("A"), unread("B"), read("C")], 2)));
        sync.fetch_unread_feed().await.unwrap();
        sync.refetch_all_notifications().await.unwrap();

        api.fail_writes.store(true, Ordering::SeqCst);
        let polling_before = sync.store().snapshot(FeedKind::Polling).await;
        let all_before = sync.store().snapshot(FeedKind::OnDemand).await;
        assert!(sync.mark_all_as_read().await.is_err());
        assert_eq!(sync.store().snapshot(FeedKind::Polling).await, polling_before);
        assert_eq!(sync.store().snapshot(FeedKind::OnDemand).await, all_before);

        api.fail_writes.store(false, Ordering::SeqCst);
        sync.mark_all_as_read().await.unwrap();
        for kind in [FeedKind::Polling, FeedKind::OnDemand] {
            let snap = sync.store().snapshot(kind).await.unwrap();
            assert_eq!(snap.unread_count, 0);
            assert!(snap.notifications.iter().all(|n| n.read));
        }

        // Idempotent saat sudah nol
        sync.mark_all_as_read().await.unwrap();
        assert_eq!(sync.unread_count().await, 0);
        assert_eq!(api.read_all_calls(), 3);
    }

    #[tokio::test]
    async fn test_invalid_id_never_reaches_remote() {
        let mut mock = MockNotificationApi::new();
        mock.expect_mark_as_read().never();

        let (sync, _board) = engine(Arc::new(mock));
        sync.store().mount().await;
        assert!(matches!(
            sync.mark_as_read("../etc").await,
            Err(AppError::BadRequest(_))
        ));
    }

    struct GatedApi {
        started: Notify,
        gate: Notify,
    }

    #[async_trait::async_trait]
    impl NotificationApi for GatedApi {
        async fn fetch_feed(&self, _query: FeedQuery) -> Result<FeedSnapshot, HttpClientError> {
            Ok(FeedSnapshot::default())
        }

        async fn mark_as_read(&self, _id: &str) -> Result<(), HttpClientError> {
            Ok(())
        }

        async fn mark_all_as_read(&self) -> Result<(), HttpClientError> {
            self.started.notify_one();
            self.gate.notified().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mutation_resolving_after_unmount_is_not_applied() {
        let api = Arc::new(GatedApi {
            started: Notify::new(),
            gate: Notify::new(),
        });
        let (sync, _board) = engine(api.clone());
        sync.store().mount().await;

        let in_flight = tokio::spawn({
            let sync = sync.clone();
            async move { sync.mark_all_as_read().await }
        });
        api.started.notified().await;

        sync.unmount().await;
        api.gate.notify_one();

        let result = in_flight.await.unwrap();
        assert!(matches!(result, Err(AppError::Unmounted)));
        assert!(sync.store().snapshot(FeedKind::Polling).await.is_none());
    }
}
