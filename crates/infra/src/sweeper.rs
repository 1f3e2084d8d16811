//! Expiry sweeper: background reclamation of abandoned holds.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{error, info};

use crate::coordinator::ReservationCoordinator;
use crate::reservation_store::ReservationStore;
use crate::stock_ledger::StockLedger;

/// Sweeper configuration.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Time between sweep cycles.
    pub interval: Duration,
    /// Name for logging.
    pub name: String,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            name: "expiry-sweeper".to_string(),
        }
    }
}

impl SweeperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Sweeper runtime statistics.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SweeperStats {
    pub sweeps_run: u64,
    pub reservations_cleaned: u64,
    pub sweep_errors: u64,
}

/// Handle to a running sweeper. Dropping the handle without calling
/// [`shutdown`](Self::shutdown) detaches the worker for the rest of the
/// process lifetime.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
    stats: Arc<Mutex<SweeperStats>>,
}

impl SweeperHandle {
    /// Request graceful shutdown and wait for the worker to finish its
    /// current sweep.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    /// Get current sweeper statistics.
    pub fn stats(&self) -> SweeperStats {
        self.stats.lock().unwrap().clone()
    }
}

/// Periodic worker that drives expired reservations through the
/// coordinator's expiry path.
///
/// One sweep runs immediately at spawn, then once per interval. A single
/// worker thread serializes sweeps by construction — two cycles can never
/// run concurrently against the same reservation set. Each instance is an
/// explicitly owned task; several can coexist in tests.
pub struct ExpirySweeper;

impl ExpirySweeper {
    pub fn spawn<L, S>(
        coordinator: Arc<ReservationCoordinator<L, S>>,
        config: SweeperConfig,
    ) -> SweeperHandle
    where
        L: StockLedger + 'static,
        S: ReservationStore + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let stats = Arc::new(Mutex::new(SweeperStats::default()));
        let stats_clone = stats.clone();

        let name = config.name.clone();
        let join = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                sweeper_loop(coordinator, config, shutdown_rx, stats_clone);
            })
            .expect("failed to spawn sweeper thread");

        SweeperHandle {
            shutdown: shutdown_tx,
            join: Some(join),
            stats,
        }
    }
}

fn sweeper_loop<L, S>(
    coordinator: Arc<ReservationCoordinator<L, S>>,
    config: SweeperConfig,
    shutdown_rx: mpsc::Receiver<()>,
    stats: Arc<Mutex<SweeperStats>>,
) where
    L: StockLedger,
    S: ReservationStore,
{
    info!(sweeper = %config.name, interval_secs = config.interval.as_secs(), "sweeper started");

    loop {
        run_sweep(&coordinator, &config, &stats);

        // The interval doubles as the shutdown poll: a shutdown message
        // wakes the worker immediately instead of after a full sleep.
        match shutdown_rx.recv_timeout(config.interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    info!(sweeper = %config.name, "sweeper stopped");
}

fn run_sweep<L, S>(
    coordinator: &ReservationCoordinator<L, S>,
    config: &SweeperConfig,
    stats: &Arc<Mutex<SweeperStats>>,
) where
    L: StockLedger,
    S: ReservationStore,
{
    match coordinator.sweep_once() {
        Ok(report) => {
            let mut s = stats.lock().unwrap();
            s.sweeps_run += 1;
            s.reservations_cleaned += report.cleaned_count as u64;
        }
        Err(e) => {
            error!(sweeper = %config.name, error = %e, "sweep cycle failed");
            let mut s = stats.lock().unwrap();
            s.sweeps_run += 1;
            s.sweep_errors += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use flashstock_core::{RequesterId, Sku};
    use flashstock_inventory::{NewStockItem, Reservation, ReservationStatus};

    use crate::coordinator::CoordinatorConfig;
    use crate::reservation_store::InMemoryReservationStore;
    use crate::stock_ledger::InMemoryStockLedger;

    type TestCoordinator =
        ReservationCoordinator<Arc<InMemoryStockLedger>, Arc<InMemoryReservationStore>>;

    fn setup() -> (
        Arc<InMemoryStockLedger>,
        Arc<InMemoryReservationStore>,
        Arc<TestCoordinator>,
    ) {
        let ledger = Arc::new(InMemoryStockLedger::new());
        let store = Arc::new(InMemoryReservationStore::new());
        let coordinator = Arc::new(ReservationCoordinator::new(
            ledger.clone(),
            store.clone(),
            CoordinatorConfig::default(),
        ));
        (ledger, store, coordinator)
    }

    fn seed_stale_hold(
        ledger: &InMemoryStockLedger,
        store: &InMemoryReservationStore,
        sku: &str,
    ) -> Reservation {
        use crate::reservation_store::ReservationStore as _;
        use crate::stock_ledger::StockLedger as _;

        let sku = Sku::parse(sku).unwrap();
        let item = NewStockItem {
            sku: sku.clone(),
            name: format!("Item {sku}"),
            description: String::new(),
            price_cents: 100,
            image_url: String::new(),
            total_quantity: 5,
        }
        .into_item(Utc::now())
        .unwrap();
        ledger.insert(item).unwrap();
        ledger.reserve(&sku, 1, Utc::now()).unwrap().unwrap();

        let stale = Reservation::new(
            sku,
            RequesterId::new("user-a").unwrap(),
            1,
            ChronoDuration::zero(),
            Utc::now() - ChronoDuration::seconds(1),
        )
        .unwrap();
        store.create(stale.clone()).unwrap()
    }

    #[test]
    fn sweeper_cleans_stale_holds_on_startup() {
        use crate::reservation_store::ReservationStore as _;
        use crate::stock_ledger::StockLedger as _;

        let (ledger, store, coordinator) = setup();
        let stale = seed_stale_hold(&ledger, &store, "WIDGET");

        let handle = ExpirySweeper::spawn(
            coordinator,
            SweeperConfig::default().with_interval(Duration::from_secs(3600)),
        );

        // First sweep runs immediately; give the thread a moment.
        let mut cleaned = false;
        for _ in 0..100 {
            if handle.stats().reservations_cleaned >= 1 {
                cleaned = true;
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        handle.shutdown();

        assert!(cleaned, "sweeper did not clean the stale hold in time");
        let record = store.find_by_id(&stale.id).unwrap().unwrap();
        assert_eq!(record.status, ReservationStatus::Expired);
        let item = ledger.find(&record.sku).unwrap().unwrap();
        assert_eq!(item.available_quantity, 5);
        assert_eq!(item.reserved_quantity, 0);
    }

    #[test]
    fn shutdown_stops_the_worker() {
        let (_ledger, _store, coordinator) = setup();
        let handle = ExpirySweeper::spawn(
            coordinator,
            SweeperConfig::default()
                .with_interval(Duration::from_millis(10))
                .with_name("test-sweeper"),
        );
        thread::sleep(Duration::from_millis(50));
        let stats = handle.stats();
        assert!(stats.sweeps_run >= 1);
        // Returns only after the thread joined.
        handle.shutdown();
    }

    #[test]
    fn multiple_sweepers_can_coexist() {
        let (_l1, _s1, c1) = setup();
        let (_l2, _s2, c2) = setup();
        let h1 = ExpirySweeper::spawn(c1, SweeperConfig::default().with_name("sweeper-1"));
        let h2 = ExpirySweeper::spawn(c2, SweeperConfig::default().with_name("sweeper-2"));
        h1.shutdown();
        h2.shutdown();
    }
}
