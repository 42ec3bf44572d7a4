//! Scheduled scrape → fetch cycle and the snapshot it publishes.

mod config;

pub use config::PollerConfig;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::{
    AccountIdentity, BALANCE_UNIT, BalanceKind, BalanceService, BalanceSnapshot, CredentialService,
    Reading, SzepClient, SzepError,
};

/// Latest successfully fetched balances, shared with readers.
///
/// Writes replace the whole snapshot at once; readers either see the old pair
/// or the new pair. Identical snapshots do not notify subscribers.
#[derive(Debug)]
pub struct SnapshotStore {
    tx: watch::Sender<Option<BalanceSnapshot>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Current snapshot, `None` before the first successful tick.
    pub fn get(&self) -> Option<BalanceSnapshot> {
        *self.tx.borrow()
    }

    /// Receiver that is notified whenever the stored snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<BalanceSnapshot>> {
        self.tx.subscribe()
    }

    /// Stores `snapshot`; returns whether the value changed.
    pub(crate) fn replace(&self, snapshot: BalanceSnapshot) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == Some(snapshot) {
                false
            } else {
                *current = Some(snapshot);
                true
            }
        })
    }
}

/// Shortest period [`BalancePoller::spawn`] will tick at.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the two-stage pipeline for one card and keeps its last good snapshot.
pub struct BalancePoller {
    name: String,
    identity: AccountIdentity,
    interval: Duration,
    credentials: Arc<dyn CredentialService>,
    balances: Arc<dyn BalanceService>,
    store: SnapshotStore,
}

impl BalancePoller {
    /// Poller that scrapes and fetches through `client`.
    pub fn new(config: PollerConfig, client: SzepClient) -> Self {
        let client = Arc::new(client);
        Self::with_services(config, client.clone(), client)
    }

    /// Poller with independently supplied stages.
    pub fn with_services(
        config: PollerConfig,
        credentials: Arc<dyn CredentialService>,
        balances: Arc<dyn BalanceService>,
    ) -> Self {
        let mut interval = config.scan_interval;
        if interval < MIN_INTERVAL {
            tracing::warn!(name = %config.name, interval = ?interval, "scan interval too short, using 1s");
            interval = MIN_INTERVAL;
        }
        Self {
            name: config.name,
            identity: config.identity,
            interval,
            credentials,
            balances,
            store: SnapshotStore::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Last good snapshot, if any tick has succeeded yet.
    pub fn snapshot(&self) -> Option<BalanceSnapshot> {
        self.store.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<BalanceSnapshot>> {
        self.store.subscribe()
    }

    /// One reading per pocket, valued from the current snapshot.
    pub fn readings(&self) -> Vec<Reading> {
        let snapshot = self.snapshot();
        BalanceKind::ALL
            .iter()
            .map(|&kind| Reading {
                kind,
                name: format!("{} - {}", self.name, kind.label()),
                unique_id: format!("{}_{}", self.name, kind.as_str()),
                value: snapshot.map(|s| s.get(kind)),
                unit: BALANCE_UNIT,
            })
            .collect()
    }

    /// Scrapes fresh credentials, fetches the balances and stores them.
    ///
    /// The stored snapshot is only touched when both stages succeed.
    ///
    /// # Errors
    ///
    /// Returns [`SzepError::Scrape`] or [`SzepError::Fetch`] from the failing stage.
    #[tracing::instrument(skip(self), fields(name = %self.name))]
    pub async fn run_once(&self) -> Result<BalanceSnapshot, SzepError> {
        let credentials = self.credentials.scrape_credentials().await?;
        let snapshot = self
            .balances
            .fetch_balance(&self.identity, &credentials)
            .await?;

        if self.store.replace(snapshot) {
            tracing::info!(
                accommodation = snapshot.accommodation,
                active_hungarians = snapshot.active_hungarians,
                "balance updated"
            );
        } else {
            tracing::debug!("balance unchanged");
        }
        Ok(snapshot)
    }

    /// Scheduled entry point: like [`run_once`](Self::run_once), but a failure
    /// is only logged and the previous snapshot stays in place.
    pub async fn tick(&self) {
        if let Err(e) = self.run_once().await {
            tracing::error!(name = %self.name, error = %e, "balance update failed, keeping last snapshot");
        }
    }

    /// Ticks immediately, then every `interval`, on a dedicated task.
    ///
    /// Ticks never overlap: a slow tick delays the next one instead of
    /// running alongside it.
    pub fn spawn(self: Arc<Self>) -> PollerHandle {
        tracing::info!(name = %self.name, interval = ?self.interval, "starting balance poller");
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.tick().await;
            }
        });
        PollerHandle { task }
    }
}

/// Handle to a running poller task.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops polling; an in-flight tick is cancelled at its next await point.
    pub fn shutdown(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
