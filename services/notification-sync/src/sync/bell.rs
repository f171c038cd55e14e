// Bell controller: policy saat dropdown notifikasi dibuka/ditutup
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::NotificationSync;
use crate::domain::BellProjection;

/// Saat bell dibuka: refresh feed on-demand, lalu kalau masih ada unread,
/// jadwalkan mark-all-as-read setelah `read_delay`. Menutup bell sebelum
/// delay habis membatalkan jadwal tersebut, termasuk saat refresh masih berjalan.
pub struct BellController {
    sync: NotificationSync,
    read_delay: Duration,
    /// Naik setiap open/close; jadwal hanya dipasang untuk open yang masih aktif
    generation: AtomicU64,
    pending_read_all: Mutex<Option<JoinHandle<()>>>,
}

impl BellController {
    pub fn new(sync: NotificationSync, read_delay: Duration) -> Self {
        Self {
            sync,
            read_delay,
            generation: AtomicU64::new(0),
            pending_read_all: Mutex::new(None),
        }
    }

    pub async fn open(&self) -> BellProjection {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_pending();

        if let Err(e) = self.sync.refetch_all_notifications().await {
            tracing::warn!("⚠️ Refresh notifikasi saat bell dibuka gagal: {}", e);
        }

        if self.sync.unread_count().await > 0 {
            self.schedule_read_all(generation);
        }

        self.sync.projection().await
    }

    pub fn close(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if self.cancel_pending() {
            tracing::debug!("Bell ditutup sebelum delay habis, mark-all dibatalkan");
        }
    }

    #[cfg(test)]
    pub fn has_pending_read_all(&self) -> bool {
        self.pending_read_all
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    fn schedule_read_all(&self, generation: u64) {
        let Ok(mut slot) = self.pending_read_all.lock() else {
            return;
        };
        // Bell sudah ditutup (atau dibuka ulang) selama refresh
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Bell tidak lagi terbuka, mark-all tidak dijadwalkan");
            return;
        }

        let sync = self.sync.clone();
        let delay = self.read_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Write jalan di task terpisah supaya close() setelah delay tidak memotongnya
            tokio::spawn(async move {
                if let Err(e) = sync.mark_all_as_read().await {
                    tracing::warn!("⚠️ Deferred mark-all-as-read gagal: {}", e);
                }
            });
        });

        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    fn cancel_pending(&self) -> bool {
        let Ok(mut slot) = self.pending_read_all.lock() else {
            return false;
        };
        match slot.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}
