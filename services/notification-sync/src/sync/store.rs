// Notification store: pemilik tunggal kedua feed cache
use shared::models::Notification;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::diff::novel_notifications;
use crate::domain::{BellProjection, FeedKind, FeedSnapshot};

/// Batas patch read-state yang disimpan per feed
const MAX_PENDING_PATCHES: usize = 64;

/// Mutasi read-state yang sudah dipasang ke cache
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReadPatch {
    One(String),
    All,
}

impl ReadPatch {
    fn apply_to(&self, snapshot: &mut FeedSnapshot) {
        match self {
            ReadPatch::One(id) => {
                if snapshot.is_unread(id) {
                    snapshot.mark_read(id);
                    snapshot.decrement_unread();
                }
            }
            ReadPatch::All => snapshot.mark_all_read(),
        }
    }
}

/// Cache entry untuk satu feed
#[derive(Debug, Clone, Default)]
pub struct FeedCache {
    pub snapshot: Option<FeedSnapshot>,
    pub fetched_at: Option<Instant>,
    /// Error fetch terakhir, di-clear saat fetch berikutnya sukses
    pub error: Option<String>,
    last_seq: u64,
    /// Patch yang lebih baru dari snapshot terpasang. Response fetch yang
    /// dimulai sebelum patch tersebut harus di-patch ulang sebelum dipasang.
    patches: Vec<(u64, ReadPatch)>,
}

impl FeedCache {
    fn record_patch(&mut self, seq: u64, patch: ReadPatch) {
        if self.patches.len() >= MAX_PENDING_PATCHES {
            self.patches.remove(0);
        }
        self.patches.push((seq, patch));
    }
}

#[derive(Debug, Default)]
struct Caches {
    polling: FeedCache,
    on_demand: FeedCache,
    epoch: u64,
    mounted: bool,
}

impl Caches {
    fn feed(&self, kind: FeedKind) -> &FeedCache {
        match kind {
            FeedKind::Polling => &self.polling,
            FeedKind::OnDemand => &self.on_demand,
        }
    }

    fn feed_mut(&mut self, kind: FeedKind) -> &mut FeedCache {
        match kind {
            FeedKind::Polling => &mut self.polling,
            FeedKind::OnDemand => &mut self.on_demand,
        }
    }

    fn accepts(&self, epoch: u64) -> bool {
        self.mounted && self.epoch == epoch
    }

    fn snapshots_mut(&mut self) -> impl Iterator<Item = &mut FeedSnapshot> {
        [&mut self.polling.snapshot, &mut self.on_demand.snapshot]
            .into_iter()
            .flatten()
    }

    fn record_patch(&mut self, seq: u64, patch: ReadPatch) {
        self.polling.record_patch(seq, patch.clone());
        self.on_demand.record_patch(seq, patch);
    }
}

/// Tiket untuk satu fetch yang sedang berjalan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub kind: FeedKind,
    epoch: u64,
    seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Snapshot dipasang; `novel` hanya terisi untuk polling feed
    Applied { novel: Vec<Notification> },
    /// Response lebih lama dari response yang sudah dipasang
    Superseded,
    /// Subsystem sudah di-unmount sejak fetch dimulai
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Changed,
    Unchanged,
    Unmounted,
}

/// Kedua snapshot hidup di balik satu lock, jadi patch ganda dari mutasi
/// read-state tidak pernah terlihat setengah jalan oleh reader.
#[derive(Debug, Default)]
pub struct NotificationStore {
    caches: RwLock<Caches>,
    next_seq: AtomicU64,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&self) -> bool {
        let mut caches = self.caches.write().await;
        if caches.mounted {
            return false;
        }
        caches.mounted = true;
        caches.polling = FeedCache::default();
        caches.on_demand = FeedCache::default();
        true
    }

    /// Hentikan penerimaan hasil fetch/mutasi yang masih in-flight dan buang cache.
    pub async fn unmount(&self) -> bool {
        let mut caches = self.caches.write().await;
        if !caches.mounted {
            return false;
        }
        caches.mounted = false;
        caches.epoch += 1;
        caches.polling = FeedCache::default();
        caches.on_demand = FeedCache::default();
        true
    }

    pub async fn is_mounted(&self) -> bool {
        self.caches.read().await.mounted
    }

    pub async fn begin_fetch(&self, kind: FeedKind) -> Option<FetchTicket> {
        let caches = self.caches.read().await;
        if !caches.mounted {
            return None;
        }
        Some(FetchTicket {
            kind,
            epoch: caches.epoch,
            seq: self.next_seq(),
        })
    }

    // Fetch dan patch berbagi satu urutan supaya bisa dibandingkan
    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Pasang snapshot hasil fetch. Untuk polling feed, diff dihitung terhadap
    /// snapshot sebelumnya di critical section yang sama.
    pub async fn complete_fetch(&self, ticket: FetchTicket, mut snapshot: FeedSnapshot) -> FetchOutcome {
        let mut caches = self.caches.write().await;
        if !caches.accepts(ticket.epoch) {
            return FetchOutcome::Unmounted;
        }

        let cache = caches.feed_mut(ticket.kind);
        if ticket.seq < cache.last_seq {
            return FetchOutcome::Superseded;
        }

        // Mutasi yang selesai selama fetch berjalan tidak boleh tertimpa
        for (_, patch) in cache.patches.iter().filter(|(seq, _)| *seq > ticket.seq) {
            patch.apply_to(&mut snapshot);
        }
        cache.patches.retain(|(seq, _)| *seq > ticket.seq);

        let novel = match ticket.kind {
            FeedKind::Polling => novel_notifications(cache.snapshot.as_ref(), &snapshot),
            FeedKind::OnDemand => Vec::new(),
        };

        cache.snapshot = Some(snapshot);
        cache.fetched_at = Some(Instant::now());
        cache.error = None;
        cache.last_seq = ticket.seq;

        FetchOutcome::Applied { novel }
    }

    /// Catat error fetch. Snapshot lama tetap dipertahankan (stale but available).
    pub async fn fail_fetch(&self, ticket: FetchTicket, message: String) -> FetchOutcome {
        let mut caches = self.caches.write().await;
        if !caches.accepts(ticket.epoch) {
            return FetchOutcome::Unmounted;
        }

        let cache = caches.feed_mut(ticket.kind);
        if ticket.seq < cache.last_seq {
            return FetchOutcome::Superseded;
        }
        cache.error = Some(message);

        FetchOutcome::Applied { novel: Vec::new() }
    }

    /// Epoch saat mutasi dimulai, `None` kalau sudah unmount
    pub async fn begin_mutation(&self) -> Option<u64> {
        let caches = self.caches.read().await;
        caches.mounted.then_some(caches.epoch)
    }

    /// Patch kedua cache setelah mark-as-read sukses di remote.
    ///
    /// Unread count hanya turun satu kali, yaitu saat id masih tercatat unread
    /// di salah satu cache.
    pub async fn apply_mark_read(&self, epoch: u64, id: &str) -> PatchOutcome {
        let mut caches = self.caches.write().await;
        if !caches.accepts(epoch) {
            return PatchOutcome::Unmounted;
        }
        caches.record_patch(self.next_seq(), ReadPatch::One(id.to_string()));

        let was_unread = caches.snapshots_mut().any(|s| s.is_unread(id));
        if !was_unread {
            return PatchOutcome::Unchanged;
        }

        for snapshot in caches.snapshots_mut() {
            snapshot.mark_read(id);
            snapshot.decrement_unread();
        }
        PatchOutcome::Changed
    }

    pub async fn apply_mark_all_read(&self, epoch: u64) -> PatchOutcome {
        let mut caches = self.caches.write().await;
        if !caches.accepts(epoch) {
            return PatchOutcome::Unmounted;
        }
        caches.record_patch(self.next_seq(), ReadPatch::All);

        let mut changed = false;
        for snapshot in caches.snapshots_mut() {
            changed |= snapshot.unread_count > 0 || snapshot.notifications.iter().any(|n| !n.read);
            snapshot.mark_all_read();
        }

        if changed {
            PatchOutcome::Changed
        } else {
            PatchOutcome::Unchanged
        }
    }

    #[cfg(test)]
    pub async fn cache(&self, kind: FeedKind) -> FeedCache {
        self.caches.read().await.feed(kind).clone()
    }

    pub async fn snapshot(&self, kind: FeedKind) -> Option<FeedSnapshot> {
        self.caches.read().await.feed(kind).snapshot.clone()
    }

    pub async fn has_snapshot(&self, kind: FeedKind) -> bool {
        self.caches.read().await.feed(kind).snapshot.is_some()
    }

    /// `true` kalau feed pernah di-fetch dan umurnya masih di bawah `max_age`
    pub async fn is_fresh(&self, kind: FeedKind, max_age: Duration) -> bool {
        self.caches
            .read()
            .await
            .feed(kind)
            .fetched_at
            .is_some_and(|at| at.elapsed() < max_age)
    }

    pub async fn unread_count(&self) -> u64 {
        let caches = self.caches.read().await;
        unread_count_of(&caches)
    }

    pub async fn projection(&self) -> BellProjection {
        let caches = self.caches.read().await;
        BellProjection {
            all_notifications: caches
                .on_demand
                .snapshot
                .as_ref()
                .map(|s| s.notifications.clone())
                .unwrap_or_default(),
            unread_count: unread_count_of(&caches),
            polling_error: caches.polling.error.clone(),
            all_error: caches.on_demand.error.clone(),
        }
    }
}

// Polling feed adalah sumber utama unread count
fn unread_count_of(caches: &Caches) -> u64 {
    caches
        .polling
        .snapshot
        .as_ref()
        .or(caches.on_demand.snapshot.as_ref())
        .map(|s| s.unread_count)
        .unwrap_or(0)
}
