// Shared draft session: one writer at a time, lock-free reads of published
// snapshots.
//
// Mutations serialize through a mutex around the engine. After each accepted
// mutation the new state is published on a watch channel as an immutable
// `Arc<DraftEngine>`, so readers never observe a half-applied pick and never
// block writers.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::debug;

use crate::config::LeagueConfig;
use crate::draft::engine::{DraftEngine, Pick, PickOutcome};
use crate::draft::player::{PlayerId, PlayerPool};
use crate::draft::snapshot::DraftSnapshot;
use crate::error::DraftError;

struct Shared {
    engine: Mutex<DraftEngine>,
    published: watch::Sender<Arc<DraftEngine>>,
}

/// Cloneable handle to one draft shared between tasks or threads.
#[derive(Clone)]
pub struct DraftSession {
    shared: Arc<Shared>,
}

impl DraftSession {
    pub fn new(engine: DraftEngine) -> Self {
        let (published, _) = watch::channel(Arc::new(engine.clone()));
        DraftSession {
            shared: Arc::new(Shared {
                engine: Mutex::new(engine),
                published,
            }),
        }
    }

    /// Run `f` against the engine under the writer lock. The resulting state
    /// is published only when `f` succeeds.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut DraftEngine) -> Result<T, DraftError>,
    ) -> Result<T, DraftError> {
        let mut engine = self.shared.engine.lock().expect("draft mutex poisoned");
        let value = f(&mut *engine)?;
        // Publish while still holding the lock so versions go out in order.
        self.shared.published.send_replace(Arc::new(engine.clone()));
        debug!("Published draft state at clock {}", engine.clock());
        Ok(value)
    }

    pub fn make_pick(&self, team: u8, player_id: PlayerId) -> Result<PickOutcome, DraftError> {
        self.mutate(|engine| engine.make_pick(team, player_id))
    }

    pub fn undo_last_pick(&self) -> Result<Pick, DraftError> {
        self.mutate(DraftEngine::undo_last_pick)
    }

    pub fn reconfigure(&self, config: LeagueConfig) -> Result<(), DraftError> {
        self.mutate(|engine| engine.reconfigure(config))
    }

    /// Replace the whole draft with one rebuilt from `snapshot`.
    ///
    /// The current state is kept if the replay fails.
    pub fn restore(&self, snapshot: &DraftSnapshot) -> Result<(), DraftError> {
        self.mutate(|engine| {
            let rebuilt = DraftEngine::from_snapshot(snapshot, engine.pool())?;
            *engine = rebuilt;
            Ok(())
        })
    }

    /// The latest published state. Later mutations do not affect it.
    pub fn view(&self) -> Arc<DraftEngine> {
        self.shared.published.borrow().clone()
    }

    /// A receiver notified after every accepted mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DraftEngine>> {
        self.shared.published.subscribe()
    }

    /// Snapshot of the latest published state.
    pub fn export(&self) -> DraftSnapshot {
        self.view().snapshot()
    }

    /// The player catalog with the latest drafted set.
    pub fn pool(&self) -> PlayerPool {
        self.view().pool().clone()
    }
}
