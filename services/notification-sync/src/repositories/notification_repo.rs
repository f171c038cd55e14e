// Repository untuk notification endpoints di HR portal API
use async_trait::async_trait;
use shared::models::NotificationPage;
use shared::utils::http_client::{HttpClientError, ServiceClient};

use crate::domain::{FeedQuery, FeedSnapshot};

/// Remote notification API yang dikonsumsi sync engine.
///
/// Semua write harus idempotent di sisi server: mark-as-read pada id yang
/// sudah dibaca dan read-all saat tidak ada unread tetap sukses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// `GET notifications(page, pageSize, unreadOnly)`
    async fn fetch_feed(&self, query: FeedQuery) -> Result<FeedSnapshot, HttpClientError>;

    /// `POST notifications/{id}/read`
    async fn mark_as_read(&self, id: &str) -> Result<(), HttpClientError>;

    /// `POST notifications/read-all`
    async fn mark_all_as_read(&self) -> Result<(), HttpClientError>;
}

// Implementasi HTTP di atas shared ServiceClient
pub struct HttpNotificationApi {
    client: ServiceClient,
}

impl HttpNotificationApi {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

// Query string untuk feed request
pub fn feed_query_params(query: &FeedQuery) -> Vec<(&'static str, String)> {
    vec![
        ("page", query.page.to_string()),
        ("limit", query.page_size.to_string()),
        ("unreadOnly", query.unread_only.to_string()),
    ]
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn fetch_feed(&self, query: FeedQuery) -> Result<FeedSnapshot, HttpClientError> {
        let page: NotificationPage = self
            .client
            .get("/notifications", &feed_query_params(&query))
            .await?;

        tracing::debug!(
            "Fetched {} notifications (unread_only={}, unread_count={})",
            page.notifications.len(),
            query.unread_only,
            page.pagination.unread_count
        );

        Ok(FeedSnapshot::from(page))
    }

    async fn mark_as_read(&self, id: &str) -> Result<(), HttpClientError> {
        self.client
            .post_ack(&format!("/notifications/{}/read", id))
            .await
    }

    async fn mark_all_as_read(&self) -> Result<(), HttpClientError> {
        self.client.post_ack("/notifications/read-all").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_query_params() {
        let params = feed_query_params(&FeedQuery::polling(50));
        assert_eq!(
            params,
            vec![
                ("page", "1".to_string()),
                ("limit", "50".to_string()),
                ("unreadOnly", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_on_demand_query_params() {
        let params = feed_query_params(&FeedQuery::on_demand(20));
        assert_eq!(params[1], ("limit", "20".to_string()));
        assert_eq!(params[2], ("unreadOnly", "false".to_string()));
    }
}
