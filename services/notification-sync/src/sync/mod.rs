//! Notification delivery & read-state synchronization.
//!
//! `NotificationSync` memegang dua feed cache (polling dan on-demand),
//! menjalankan poller, mengirim alert untuk notifikasi baru, dan menerapkan
//! mutasi read-state ke kedua cache sekaligus.

pub mod alerts;
pub mod bell;
pub mod diff;
mod fetch;
mod poller;
mod read_state;
pub mod store;

pub use alerts::{AlertBoard, AlertDispatcher, AlertSink};
pub use bell::BellController;
pub use poller::Visibility;
pub use store::NotificationStore;

use std::sync::{Arc, Mutex};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::config::SyncConfig;
use crate::domain::BellProjection;
use crate::repositories::NotificationApi;

struct SyncInner {
    api: Arc<dyn NotificationApi>,
    store: NotificationStore,
    dispatcher: AlertDispatcher,
    config: SyncConfig,
    visibility: watch::Sender<Visibility>,
    focus: Notify,
    poller: Mutex<Option<JoinHandle<()>>>,
}

/// Handle ke sync engine, murah untuk di-clone
#[derive(Clone)]
pub struct NotificationSync {
    inner: Arc<SyncInner>,
}

impl NotificationSync {
    pub fn new(api: Arc<dyn NotificationApi>, sink: Arc<dyn AlertSink>, config: SyncConfig) -> Self {
        let (visibility, _) = watch::channel(Visibility::Visible);

        Self {
            inner: Arc::new(SyncInner {
                api,
                store: NotificationStore::new(),
                dispatcher: AlertDispatcher::new(sink, config.alert_duration),
                config,
                visibility,
                focus: Notify::new(),
                poller: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub(crate) fn store(&self) -> &NotificationStore {
        &self.inner.store
    }

    /// Mulai polling. Tidak berpengaruh kalau sudah mounted.
    pub async fn mount(&self) {
        if !self.inner.store.mount().await {
            return;
        }

        let handle = tokio::spawn(poller::run(
            self.clone(),
            self.inner.visibility.subscribe(),
        ));

        if let Ok(mut slot) = self.inner.poller.lock() {
            if let Some(previous) = slot.replace(handle) {
                previous.abort();
            }
        }
        tracing::info!("✅ Notification sync mounted");
    }

    /// Stop polling dan abaikan semua hasil in-flight yang selesai setelah ini
    pub async fn unmount(&self) {
        if let Ok(mut slot) = self.inner.poller.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }

        if self.inner.store.unmount().await {
            tracing::info!("🛑 Notification sync unmounted");
        }
    }

    pub async fn is_mounted(&self) -> bool {
        self.inner.store.is_mounted().await
    }

    /// Host page masuk/keluar background
    pub fn set_hidden(&self, hidden: bool) {
        let next = if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
        self.inner.visibility.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    pub fn visibility(&self) -> Visibility {
        *self.inner.visibility.borrow()
    }

    /// Window mendapatkan fokus lagi
    pub fn focus_regained(&self) {
        self.inner.focus.notify_one();
    }

    pub async fn projection(&self) -> BellProjection {
        self.inner.store.projection().await
    }

    #[cfg(test)]
    pub async fn all_notifications(&self) -> Vec<shared::models::Notification> {
        self.inner.store.projection().await.all_notifications
    }

    pub async fn unread_count(&self) -> u64 {
        self.inner.store.unread_count().await
    }
}
