// src/autosave.rs
//
// Debounced autosave, modeled explicitly: scheduling a save aborts any save
// already pending and re-arms the timer; tearing the scheduler down cancels
// whatever is in flight so nothing writes after the form is gone.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::model::WeeklyEntry;
use crate::validation::is_valid_for_save;

// Quiet period after the last edit before the save fires.
pub const AUTOSAVE_QUIET_PERIOD: Duration = Duration::from_millis(900);

/// Where the deferred save lands once the quiet period elapses. Explicit
/// save and autosave share the same upsert underneath.
#[async_trait]
pub trait EntrySink: Send + Sync {
    async fn persist(&self, entry: WeeklyEntry) -> Result<()>;
}

pub struct AutosaveScheduler {
    quiet_period: Duration,
    sink: Arc<dyn EntrySink>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl AutosaveScheduler {
    pub fn new(sink: Arc<dyn EntrySink>) -> Self {
        Self::with_quiet_period(sink, AUTOSAVE_QUIET_PERIOD)
    }

    pub fn with_quiet_period(sink: Arc<dyn EntrySink>, quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            sink,
            pending: Mutex::new(None),
        }
    }

    /// Arms (or re-arms) the deferred save with the latest entry state.
    /// Entries with outstanding required-field issues are skipped silently.
    pub fn schedule(&self, entry: WeeklyEntry) {
        if !is_valid_for_save(&entry) {
            debug!(
                "Autosave skipped for '{}': required fields incomplete",
                entry.employee_name
            );
            return;
        }
        let sink = Arc::clone(&self.sink);
        let quiet_period = self.quiet_period;
        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if let Err(err) = sink.persist(entry).await {
                warn!("Autosave failed: {:#}", err);
            }
        }));
    }

    /// Teardown: no write may happen once the owning form goes away.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().unwrap().take() {
            previous.abort();
        }
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
