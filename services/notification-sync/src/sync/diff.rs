// Diff engine: deteksi notifikasi baru antar polling cycle
use shared::models::Notification;

use crate::domain::FeedSnapshot;

/// Notifikasi di `next` yang id-nya tidak ada di `previous`, urutan mengikuti `next`.
///
/// Tanpa snapshot sebelumnya (fetch pertama setelah mount) hasilnya selalu
/// kosong, backlog unread tidak di-replay sebagai alert.
pub fn novel_notifications(
    previous: Option<&FeedSnapshot>,
    next: &FeedSnapshot,
) -> Vec<Notification> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    let seen = previous.ids();
    next.notifications
        .iter()
        .filter(|n| !seen.contains(n.id.as_str()))
        .cloned()
        .collect()
}
