//! Debounced, latest-wins customer search.
//!
//! Rapid query submissions coalesce into a single store query issued after a
//! short quiet period. Every submission gets a monotonically increasing
//! request id; a previously in-flight query is aborted when a newer one
//! arrives, and a completion is published only while its id is still the
//! latest. A stale completion can never overwrite a newer result.
//!
//! Supersession is scoped to one caller's input stream: [`SearchRegistry`]
//! keeps a [`DebouncedSearch`] per staff id, so two people searching at the
//! same time never coalesce into each other's results.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use coffeedocket_core::StaffId;
use coffeedocket_ledger::Customer;
use coffeedocket_store::{CustomerStore, StoreError};

/// Quiet period before a submitted query is actually issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A published search completion.
#[derive(Debug, Clone)]
pub struct SearchUpdate {
    pub request_id: u64,
    pub query: String,
    pub outcome: Result<Vec<Customer>, StoreError>,
}

pub struct DebouncedSearch {
    customers: Arc<dyn CustomerStore>,
    debounce: Duration,
    latest: Arc<AtomicU64>,
    tx: watch::Sender<SearchUpdate>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedSearch {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self::with_debounce(customers, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(customers: Arc<dyn CustomerStore>, debounce: Duration) -> Self {
        let (tx, _rx) = watch::channel(SearchUpdate {
            request_id: 0,
            query: String::new(),
            outcome: Ok(Vec::new()),
        });
        Self {
            customers,
            debounce,
            latest: Arc::new(AtomicU64::new(0)),
            tx,
            in_flight: Mutex::new(None),
        }
    }

    /// Queue a query, superseding any pending one. Returns its request id.
    pub fn submit(&self, query: String) -> u64 {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let customers = Arc::clone(&self.customers);
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != id {
                return;
            }
            let outcome = customers.search_customers(&query).await;
            if latest.load(Ordering::SeqCst) != id {
                return;
            }
            tx.send_replace(SearchUpdate {
                request_id: id,
                query,
                outcome,
            });
        });

        let mut in_flight = self.in_flight.lock().unwrap();
        if let Some(stale) = in_flight.replace(handle) {
            stale.abort();
        }
        id
    }

    /// Watch completions as they are published.
    pub fn subscribe(&self) -> watch::Receiver<SearchUpdate> {
        self.tx.subscribe()
    }

    /// Submit a query and wait for a result at least as new as it.
    ///
    /// Callers coalesced away by a newer submission receive that newer
    /// result rather than waiting forever.
    pub async fn search(&self, query: &str) -> Result<Vec<Customer>, StoreError> {
        let mut rx = self.subscribe();
        let id = self.submit(query.to_string());
        loop {
            {
                let update = rx.borrow_and_update();
                if update.request_id >= id {
                    return update.outcome.clone();
                }
            }
            if rx.changed().await.is_err() {
                return Err(StoreError::unavailable("search publisher dropped"));
            }
        }
    }
}

/// One debounce stream per authenticated caller, created on first use.
pub struct SearchRegistry {
    customers: Arc<dyn CustomerStore>,
    debounce: Duration,
    streams: Mutex<HashMap<StaffId, Arc<DebouncedSearch>>>,
}

impl SearchRegistry {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self::with_debounce(customers, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(customers: Arc<dyn CustomerStore>, debounce: Duration) -> Self {
        Self {
            customers,
            debounce,
            streams: Mutex::new(HashMap::new()),
        }
    }

    /// The caller's own stream. Submissions on it supersede only that
    /// caller's earlier queries.
    pub fn stream_for(&self, staff_id: StaffId) -> Arc<DebouncedSearch> {
        let mut streams = self.streams.lock().unwrap();
        Arc::clone(streams.entry(staff_id).or_insert_with(|| {
            Arc::new(DebouncedSearch::with_debounce(
                Arc::clone(&self.customers),
                self.debounce,
            ))
        }))
    }

    /// Debounced search on the caller's own stream.
    pub async fn search(&self, staff_id: StaffId, query: &str) -> Result<Vec<Customer>, StoreError> {
        self.stream_for(staff_id).search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use coffeedocket_core::CustomerId;
    use coffeedocket_ledger::NewCustomer;
    use coffeedocket_store::InMemoryStore;

    async fn seeded_store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::default());
        for (first, last, email) in [
            ("Alice", "Nguyen", "alice@example.com"),
            ("Albert", "Stone", "albert@example.com"),
            ("Maya", "Okafor", "maya@example.com"),
        ] {
            let customer = NewCustomer {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: Some(email.to_string()),
                phone: None,
                notify_email: false,
                notify_sms: false,
            }
            .into_customer(CustomerId::new(), Utc::now())
            .unwrap();
            store.insert_customer(customer).await.unwrap();
        }
        store
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_submissions_coalesce_into_one_result() {
        let store = seeded_store().await;
        let search = DebouncedSearch::new(store);
        let mut rx = search.subscribe();

        search.submit("al".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        let final_id = search.submit("alice".to_string());

        tokio::time::sleep(Duration::from_millis(500)).await;

        rx.changed().await.unwrap();
        let update = rx.borrow_and_update().clone();
        assert_eq!(update.request_id, final_id);
        assert_eq!(update.query, "alice");
        let names: Vec<String> = update
            .outcome
            .unwrap()
            .iter()
            .map(|c| c.first_name.clone())
            .collect();
        assert_eq!(names, vec!["Alice"]);

        // The superseded "al" query never published anything.
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_completion_cannot_overwrite_a_newer_result() {
        let store = seeded_store().await;
        let search = DebouncedSearch::new(store);

        let first = search.submit("maya".to_string());
        tokio::time::sleep(Duration::from_millis(500)).await;

        // Two quick follow-ups; only the last survives.
        search.submit("albert".to_string());
        let last = search.submit("alice".to_string());
        tokio::time::sleep(Duration::from_millis(500)).await;

        let rx = search.subscribe();
        let update = rx.borrow().clone();
        assert!(first < last);
        assert_eq!(update.request_id, last);
        assert_eq!(update.query, "alice");
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_keep_their_own_results() {
        let store = seeded_store().await;
        let registry = Arc::new(SearchRegistry::new(store));
        let caller_a = StaffId::new();
        let caller_b = StaffId::new();

        // Caller B's query lands while caller A's is still debouncing; it
        // must not supersede A's.
        let reg = Arc::clone(&registry);
        let a = tokio::spawn(async move { reg.search(caller_a, "alice").await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        let reg = Arc::clone(&registry);
        let b = tokio::spawn(async move { reg.search(caller_b, "maya").await });

        let results_a = a.await.unwrap().unwrap();
        let results_b = b.await.unwrap().unwrap();
        assert_eq!(results_a.len(), 1);
        assert_eq!(results_a[0].first_name, "Alice");
        assert_eq!(results_b.len(), 1);
        assert_eq!(results_b[0].first_name, "Maya");
    }

    #[tokio::test(start_paused = true)]
    async fn search_waits_for_its_own_or_a_newer_result() {
        let store = seeded_store().await;
        let search = Arc::new(DebouncedSearch::new(store));

        let results = search.search("okafor").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].last_name, "Okafor");

        let everyone = search.search("").await.unwrap();
        assert_eq!(everyone.len(), 3);
    }
}
