use serde::Serialize;
use shared::models::{Notification, NotificationPage};
use std::collections::HashSet;
use utoipa::ToSchema;

/// Dua feed yang di-cache secara terpisah
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    /// Unread feed yang di-poll tiap interval
    Polling,
    /// Feed lengkap yang hanya diambil saat bell dibuka
    OnDemand,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Polling => "polling",
            FeedKind::OnDemand => "on_demand",
        }
    }
}

/// Parameter query untuk `GET /notifications`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub page: u32,
    pub page_size: u32,
    pub unread_only: bool,
}

impl FeedQuery {
    pub fn polling(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            unread_only: true,
        }
    }

    pub fn on_demand(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            unread_only: false,
        }
    }
}

/// Snapshot satu feed beserta metadata pagination.
///
/// Snapshot diganti utuh setiap fetch dan hanya di-patch in place oleh
/// mutasi read-state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub total: u64,
}

impl From<NotificationPage> for FeedSnapshot {
    fn from(page: NotificationPage) -> Self {
        Self {
            notifications: page.notifications,
            unread_count: page.pagination.unread_count,
            total: page.pagination.total,
        }
    }
}

impl FeedSnapshot {
    pub fn ids(&self) -> HashSet<&str> {
        self.notifications.iter().map(|n| n.id.as_str()).collect()
    }

    #[cfg(test)]
    pub fn contains(&self, id: &str) -> bool {
        self.notifications.iter().any(|n| n.id == id)
    }

    pub fn is_unread(&self, id: &str) -> bool {
        self.notifications.iter().any(|n| n.id == id && !n.read)
    }

    /// Set `read = true` untuk id tersebut
    pub fn mark_read(&mut self, id: &str) {
        for notif in self.notifications.iter_mut().filter(|n| n.id == id) {
            notif.read = true;
        }
    }

    pub fn decrement_unread(&mut self) {
        self.unread_count = self.unread_count.saturating_sub(1);
    }

    pub fn mark_all_read(&mut self) {
        for notif in self.notifications.iter_mut() {
            notif.read = true;
        }
        self.unread_count = 0;
    }
}

/// Proyeksi read-only yang diberikan ke bell presentation surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BellProjection {
    pub all_notifications: Vec<Notification>,
    pub unread_count: u64,
    pub polling_error: Option<String>,
    pub all_error: Option<String>,
}
