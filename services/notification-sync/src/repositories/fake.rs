// Scripted in-memory NotificationApi untuk skenario multi-poll
use async_trait::async_trait;
use shared::utils::http_client::HttpClientError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::NotificationApi;
use crate::domain::{FeedQuery, FeedSnapshot};

type FeedResult = Result<FeedSnapshot, HttpClientError>;

#[derive(Default)]
struct Script {
    queue: VecDeque<FeedResult>,
    last: Option<FeedSnapshot>,
}

impl Script {
    fn next(&mut self) -> FeedResult {
        match self.queue.pop_front() {
            Some(Ok(snapshot)) => {
                self.last = Some(snapshot.clone());
                Ok(snapshot)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.clone().unwrap_or_default()),
        }
    }
}

#[derive(Default)]
pub(crate) struct ScriptedApi {
    unread: Mutex<Script>,
    all: Mutex<Script>,
    pub fail_writes: AtomicBool,
    pub unread_fetches: AtomicUsize,
    pub all_fetches: AtomicUsize,
    pub read_calls: Mutex<Vec<String>>,
    pub read_all_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_unread(&self, result: FeedResult) {
        if let Ok(mut script) = self.unread.lock() {
            script.queue.push_back(result);
        }
    }

    pub fn push_all(&self, result: FeedResult) {
        if let Ok(mut script) = self.all.lock() {
            script.queue.push_back(result);
        }
    }

    pub fn unread_fetches(&self) -> usize {
        self.unread_fetches.load(Ordering::SeqCst)
    }

    pub fn all_fetches(&self) -> usize {
        self.all_fetches.load(Ordering::SeqCst)
    }

    pub fn read_all_calls(&self) -> usize {
        self.read_all_calls.load(Ordering::SeqCst)
    }

    fn write_result(&self) -> Result<(), HttpClientError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(HttpClientError::ServiceUnavailable("scripted failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationApi for ScriptedApi {
    async fn fetch_feed(&self, query: FeedQuery) -> FeedResult {
        let script = if query.unread_only {
            self.unread_fetches.fetch_add(1, Ordering::SeqCst);
            &self.unread
        } else {
            self.all_fetches.fetch_add(1, Ordering::SeqCst);
            &self.all
        };

        match script.lock() {
            Ok(mut script) => script.next(),
            Err(_) => Err(HttpClientError::RequestFailed("poisoned".to_string())),
        }
    }

    async fn mark_as_read(&self, id: &str) -> Result<(), HttpClientError> {
        if let Ok(mut calls) = self.read_calls.lock() {
            calls.push(id.to_string());
        }
        self.write_result()
    }

    async fn mark_all_as_read(&self) -> Result<(), HttpClientError> {
        self.read_all_calls.fetch_add(1, Ordering::SeqCst);
        self.write_result()
    }
}
