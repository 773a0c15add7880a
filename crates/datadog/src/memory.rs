//! In-memory boards API.
//!
//! Behaves like the remote service for the parts the provider relies on:
//! ids are assigned on create, widgets get ids, missing dashboards are
//! reported as [`ApiError::NotFound`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashform_model::{Dashboard, Definition};
use tokio::sync::{Mutex, RwLock};

use crate::BoardApi;
use crate::error::{ApiError, Result};

/// A failure queued with [`MemoryBoardApi::fail_next`].
#[derive(Debug, Clone)]
struct QueuedFailure {
    status: u16,
    message: String,
}

/// Boards API that keeps dashboards in a map.
#[derive(Debug, Default)]
pub struct MemoryBoardApi {
    boards: RwLock<BTreeMap<String, Dashboard>>,
    next_board: AtomicU64,
    next_widget: AtomicI64,
    calls: AtomicUsize,
    failure: Mutex<Option<QueuedFailure>>,
}

impl MemoryBoardApi {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call fail with the given HTTP status.
    pub async fn fail_next(&self, status: u16, message: impl Into<String>) {
        *self.failure.lock().await = Some(QueuedFailure {
            status,
            message: message.into(),
        });
    }

    /// Number of API calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Stored dashboard, as the service would return it.
    pub async fn stored(&self, id: &str) -> Option<Dashboard> {
        self.boards.read().await.get(id).cloned()
    }

    /// Replaces a stored dashboard, simulating an edit made outside the provider.
    pub async fn put(&self, dashboard: Dashboard) {
        if let Some(id) = dashboard.id.clone() {
            self.boards.write().await.insert(id, dashboard);
        }
    }

    /// Removes a dashboard, simulating a deletion made outside the provider.
    pub async fn remove(&self, id: &str) -> Option<Dashboard> {
        self.boards.write().await.remove(id)
    }

    async fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().await.take() {
            Some(QueuedFailure { status, message }) => Err(ApiError::Status { status, message }),
            None => Ok(()),
        }
    }

    fn assign_widget_ids(&self, dashboard: &mut Dashboard) {
        for widget in &mut dashboard.widgets {
            if widget.id.is_none() {
                widget.id = Some(self.widget_id());
            }
            if let Definition::Group(group) = &mut widget.definition {
                for child in group.widgets.iter_mut().filter(|c| c.id.is_none()) {
                    child.id = Some(self.widget_id());
                }
            }
        }
    }

    fn widget_id(&self) -> i64 {
        self.next_widget.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl BoardApi for MemoryBoardApi {
    async fn create_board(&self, dashboard: &Dashboard) -> Result<Dashboard> {
        self.enter().await?;
        let n = self.next_board.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("abc-def-{n:03}");

        let mut created = dashboard.clone();
        created.id = Some(id.clone());
        created.url = Some(format!("/dashboard/{id}"));
        self.assign_widget_ids(&mut created);

        self.boards.write().await.insert(id, created.clone());
        Ok(created)
    }

    async fn update_board(&self, dashboard: &Dashboard) -> Result<()> {
        self.enter().await?;
        let id = dashboard.id.clone().ok_or(ApiError::MissingId)?;

        let mut boards = self.boards.write().await;
        let Some(existing) = boards.get(&id) else {
            return Err(ApiError::NotFound { id });
        };

        let mut updated = dashboard.clone();
        updated.url.clone_from(&existing.url);
        self.assign_widget_ids(&mut updated);
        boards.insert(id, updated);
        Ok(())
    }

    async fn get_board(&self, id: &str) -> Result<Dashboard> {
        self.enter().await?;
        self.boards
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })
    }

    async fn delete_board(&self, id: &str) -> Result<()> {
        self.enter().await?;
        self.boards
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })
    }

    fn api_name(&self) -> &'static str {
        "memory"
    }
}
