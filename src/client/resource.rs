use super::{ApiClient, ClientError};
use crate::handlers::common::PaginationMeta;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::RwLock;
use tracing::{error, instrument, warn};

/// Page state before the first successful fetch
fn initial_pagination() -> PaginationMeta {
    PaginationMeta {
        current_page: 1,
        last_page: 1,
        per_page: 10,
        total: 0,
        from: None,
        to: None,
    }
}

/// Copy of a collection's state at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
    pub loading: bool,
}

struct CollectionState<T> {
    items: Vec<T>,
    pagination: PaginationMeta,
    /// Ticket of the response currently shown, 0 before any
    applied: u64,
}

/// Client-side view of one paginated REST collection, e.g. `/categories`.
///
/// Fetches may finish out of order. Each one takes a ticket when issued and
/// its response is applied only if nothing newer has been applied, so a slow
/// stale refresh never overwrites a fresher page. Fetch failures are logged
/// and leave the state as it was; mutation failures are logged and returned.
pub struct ResourceCollection<T> {
    client: ApiClient,
    path: String,
    state: Arc<RwLock<CollectionState<T>>>,
    next_ticket: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
}

impl<T> Clone for ResourceCollection<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            state: self.state.clone(),
            next_ticket: self.next_ticket.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

/// Decrements the in-flight count when a fetch ends, however it ends
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<T> ResourceCollection<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// `path` is the collection path below `/api/v1`, e.g. `/locations`
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            state: Arc::new(RwLock::new(CollectionState {
                items: Vec::new(),
                pagination: initial_pagination(),
                applied: 0,
            })),
            next_ticket: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    pub async fn pagination(&self) -> PaginationMeta {
        self.state.read().await.pagination.clone()
    }

    /// True while any fetch is in flight
    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn snapshot(&self) -> CollectionSnapshot<T> {
        let state = self.state.read().await;
        CollectionSnapshot {
            items: state.items.clone(),
            pagination: state.pagination.clone(),
            loading: self.loading(),
        }
    }

    /// Loads one page. Errors are logged and swallowed.
    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn fetch(&self, page: u64, per_page: u64) {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight::start(&self.in_flight);

        match self.client.list::<T>(&self.path, page, per_page).await {
            Ok(response) => {
                let mut state = self.state.write().await;
                if ticket > state.applied {
                    state.items = response.data;
                    state.pagination = response.pagination;
                    state.applied = ticket;
                } else {
                    warn!(ticket, applied = state.applied, "Discarding stale page");
                }
            }
            Err(e) => error!(error = %e, page, per_page, "Failed to fetch collection"),
        }
    }

    async fn refresh(&self) {
        let (page, per_page) = {
            let state = self.state.read().await;
            (state.pagination.current_page, state.pagination.per_page)
        };
        self.fetch(page, per_page).await;
    }

    /// Creates a resource, then re-fetches the current page
    #[instrument(skip(self, body), fields(path = %self.path))]
    pub async fn create<B: Serialize>(&self, body: &B) -> Result<T, ClientError> {
        let created = self
            .client
            .create::<B, T>(&self.path, body)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to create resource");
                e
            })?;
        self.refresh().await;
        Ok(created)
    }

    /// Updates a resource, then re-fetches the current page
    #[instrument(skip(self, body), fields(path = %self.path))]
    pub async fn update<B: Serialize>(&self, id: i32, body: &B) -> Result<T, ClientError> {
        let updated = self
            .client
            .update::<B, T>(&self.path, id, body)
            .await
            .map_err(|e| {
                error!(error = %e, id, "Failed to update resource");
                e
            })?;
        self.refresh().await;
        Ok(updated)
    }

    /// Deletes a resource, then re-fetches the current page
    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn delete(&self, id: i32) -> Result<(), ClientError> {
        self.client.delete(&self.path, id).await.map_err(|e| {
            error!(error = %e, id, "Failed to delete resource");
            e
        })?;
        self.refresh().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_with_default_pagination() {
        let collection: ResourceCollection<serde_json::Value> =
            ResourceCollection::new(ApiClient::new("http://localhost:1"), "/categories");
        let snapshot = collection.snapshot().await;
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.pagination, initial_pagination());
        assert_eq!(snapshot.pagination.per_page, 10);
        assert!(!snapshot.loading);
    }

    #[test]
    fn in_flight_guard_tracks_loading() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let _a = InFlight::start(&counter);
            let _b = InFlight::start(&counter);
            assert_eq!(counter.load(Ordering::SeqCst), 2);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
