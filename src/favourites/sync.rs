use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use super::stats::FavouriteStats;
use crate::db::{FavouriteItem, FavouriteRepo, Outcome, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Keep,
    /// Undo the optimistic change if no newer toggle replaced it.
    Revert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    /// The initial load failed; the view started out empty.
    ReadyEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Committed(Outcome),
    /// A newer toggle of the same id took over before this write finished.
    Superseded,
    Failed,
    Reverted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toggle {
    pub external_id: i64,
    pub favourited: bool,
    pub write: WriteStatus,
}

#[derive(Debug)]
struct Intent {
    seq: u64,
    favourited: bool,
    in_flight: u32,
    settled: bool,
    // a superseded write of the opposite direction landed while this intent
    // was still in flight
    dirty: bool,
}

#[derive(Debug, Default)]
struct SyncState {
    phase: Phase,
    items: HashMap<i64, FavouriteItem>,
    intents: HashMap<i64, Intent>,
    next_seq: u64,
    reload_seq: u64,
}

impl SyncState {
    fn begin(&mut self, item: &FavouriteItem, favourited: bool) -> u64 {
        let id = item.external_id;
        if favourited {
            self.items.insert(id, item.clone());
        } else {
            self.items.remove(&id);
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        let intent = self.intents.entry(id).or_insert(Intent {
            seq,
            favourited,
            in_flight: 0,
            settled: false,
            dirty: false,
        });
        intent.seq = seq;
        intent.favourited = favourited;
        intent.in_flight += 1;
        intent.settled = false;
        intent.dirty = false;
        seq
    }

    fn replace(&mut self, list: Vec<FavouriteItem>) {
        let mut items: HashMap<i64, FavouriteItem> =
            list.into_iter().map(|i| (i.external_id, i)).collect();
        // Any write still outstanding, stale or not, may yet change the
        // store, so the view keeps the intent for those ids.
        for (id, intent) in &self.intents {
            if intent.settled && intent.in_flight == 0 {
                continue;
            }
            if intent.favourited {
                if let Some(item) = self.items.get(id) {
                    items.insert(*id, item.clone());
                }
            } else {
                items.remove(id);
            }
        }
        self.items = items;
    }
}

/// Session view of the favourites set. Toggles hit the view first and the
/// store afterwards; the newest toggle of an id wins in both.
pub struct FavouritesSync {
    store: Arc<dyn FavouriteRepo>,
    policy: FailurePolicy,
    state: Mutex<SyncState>,
    reloaded: Notify,
}

impl FavouritesSync {
    pub fn new(store: Arc<dyn FavouriteRepo>, policy: FailurePolicy) -> Self {
        Self {
            store,
            policy,
            state: Mutex::new(SyncState::default()),
            reloaded: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn loaded(&self) -> bool {
        matches!(self.phase(), Phase::Ready | Phase::ReadyEmpty)
    }

    pub fn is_favourited(&self, external_id: i64) -> bool {
        self.lock().items.contains_key(&external_id)
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> Vec<FavouriteItem> {
        let mut items: Vec<FavouriteItem> = self.lock().items.values().cloned().collect();
        items.sort_by_key(|i| i.external_id);
        items
    }

    pub fn stats(&self) -> FavouriteStats {
        FavouriteStats::from_items(self.lock().items.values())
    }

    /// A store failure leaves an empty, loaded view. Never returns `Loading`:
    /// if a resync overtakes this load, waits for that one.
    pub async fn load(&self) -> Phase {
        match self.reload().await {
            Ok(Some(count)) => info!("Loaded {} favourites", count),
            Ok(None) => debug!("Initial favourites load overtaken by a resync"),
            Err(e) => warn!("Failed to load favourites: {}", e),
        }
        loop {
            let reloaded = self.reloaded.notified();
            if self.loaded() {
                return self.phase();
            }
            reloaded.await;
        }
    }

    /// On failure the current view is kept. `Ok(None)` when a newer resync
    /// took over and this response was dropped.
    pub async fn became_active(&self) -> StoreResult<Option<usize>> {
        debug!("Session active again, reloading favourites");
        self.reload().await
    }

    async fn reload(&self) -> StoreResult<Option<usize>> {
        let token = {
            let mut state = self.lock();
            state.reload_seq += 1;
            if state.phase == Phase::Uninitialized {
                state.phase = Phase::Loading;
            }
            state.reload_seq
        };

        let result = self.store.list().await;

        let mut state = self.lock();
        if token != state.reload_seq {
            debug!("Discarding superseded favourites reload");
            return Ok(None);
        }
        let applied = match result {
            Ok(list) => {
                let count = list.len();
                state.replace(list);
                state.phase = Phase::Ready;
                Ok(Some(count))
            }
            Err(e) => {
                if state.phase == Phase::Loading {
                    state.replace(Vec::new());
                    state.phase = Phase::ReadyEmpty;
                }
                Err(e)
            }
        };
        drop(state);
        self.reloaded.notify_waiters();
        applied
    }

    pub async fn toggle(&self, item: FavouriteItem) -> Toggle {
        let (seq, favourited) = {
            let mut state = self.lock();
            let favourited = !state.items.contains_key(&item.external_id);
            (state.begin(&item, favourited), favourited)
        };
        debug!(
            external_id = item.external_id,
            seq, favourited, "Toggling favourite"
        );
        self.finish(item, seq, favourited).await
    }

    /// `None` when the id is not in the view.
    pub async fn unfavourite(&self, external_id: i64) -> Option<Toggle> {
        let (item, seq) = {
            let mut state = self.lock();
            let item = state.items.get(&external_id)?.clone();
            let seq = state.begin(&item, false);
            (item, seq)
        };
        Some(self.finish(item, seq, false).await)
    }

    async fn finish(&self, item: FavouriteItem, seq: u64, favourited: bool) -> Toggle {
        let result = self.write(&item, favourited).await;
        let (status, mut repair) = self.complete(&item, seq, favourited, &result);

        while let Some((repair_seq, want)) = repair {
            info!(
                "Re-issuing favourite write for {} (favourited: {})",
                item.external_id, want
            );
            let result = self.write(&item, want).await;
            repair = self.complete(&item, repair_seq, want, &result).1;
        }

        Toggle {
            external_id: item.external_id,
            favourited: if status == WriteStatus::Reverted {
                !favourited
            } else {
                favourited
            },
            write: status,
        }
    }

    async fn write(&self, item: &FavouriteItem, favourited: bool) -> StoreResult<Outcome> {
        if favourited {
            self.store.add(item).await
        } else {
            self.store.remove(item.external_id).await
        }
    }

    // Returns the caller's status and, if the store may have fallen behind
    // the view, the intent to write again.
    fn complete(
        &self,
        item: &FavouriteItem,
        seq: u64,
        wrote: bool,
        result: &StoreResult<Outcome>,
    ) -> (WriteStatus, Option<(u64, bool)>) {
        let id = item.external_id;
        let mut state = self.lock();
        let state = &mut *state;
        let Some(intent) = state.intents.get_mut(&id) else {
            return (WriteStatus::Superseded, None);
        };
        intent.in_flight = intent.in_flight.saturating_sub(1);

        let mut repair = None;
        let status = if intent.seq == seq {
            match result {
                Ok(outcome) => {
                    if intent.dirty {
                        intent.dirty = false;
                        intent.in_flight += 1;
                        repair = Some((seq, intent.favourited));
                    } else {
                        intent.settled = true;
                    }
                    WriteStatus::Committed(*outcome)
                }
                Err(e) => {
                    warn!("Favourite write for {} failed: {}", id, e);
                    intent.settled = true;
                    intent.dirty = false;
                    match self.policy {
                        FailurePolicy::Keep => WriteStatus::Failed,
                        FailurePolicy::Revert => {
                            intent.favourited = !wrote;
                            if wrote {
                                state.items.remove(&id);
                            } else {
                                state.items.insert(id, item.clone());
                            }
                            WriteStatus::Reverted
                        }
                    }
                }
            }
        } else {
            let changed = matches!(result, Ok(outcome) if outcome.changed());
            if changed && wrote != intent.favourited {
                if intent.settled {
                    intent.settled = false;
                    intent.in_flight += 1;
                    repair = Some((intent.seq, intent.favourited));
                } else {
                    intent.dirty = true;
                }
            }
            WriteStatus::Superseded
        };

        if intent.settled && intent.in_flight == 0 {
            state.intents.remove(&id);
        }
        (status, repair)
    }
}
