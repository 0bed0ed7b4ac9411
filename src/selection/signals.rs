//! Typed outward notifications.
//!
//! A [`Signal`] delivers each emitted value synchronously, once, to every
//! subscriber that is active at the moment of delivery. Emission iterates a
//! snapshot of the subscriber list, so a callback may unsubscribe itself (or
//! anyone else) without disturbing the ongoing delivery.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::IVec2;

use crate::board::{BuildingKind, CellCollection, CellId, TerrainKind};

use super::result::FinishedSelection;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscriber<T> {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Callback<T>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: self.active.clone(),
            callback: self.callback.clone(),
        }
    }
}

/// Handle returned by [`Signal::subscribe`]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
}

pub struct Signal<T> {
    subscribers: Mutex<Vec<Subscriber<T>>>,
    next_id: AtomicU64,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl<T> Signal<T> {
    fn lock(&self) -> MutexGuard<'_, Vec<Subscriber<T>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        self.lock().push(Subscriber {
            id,
            active: active.clone(),
            callback: Arc::new(callback),
        });
        Subscription { id, active }
    }

    /// Stop delivery to `subscription`. Safe to call from inside a callback,
    /// including the subscriber's own.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        subscription.active.store(false, Ordering::Release);
        self.lock().retain(|s| s.id != subscription.id);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn emit(&self, value: &T) {
        // The lock is released before any callback runs
        let snapshot: Vec<Subscriber<T>> = self.lock().clone();
        for subscriber in snapshot {
            if subscriber.active.load(Ordering::Acquire) {
                (subscriber.callback)(value);
            }
        }
    }
}

/// Payload of the hover notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoveredCell {
    pub id: CellId,
    pub coord: IVec2,
    pub terrain: TerrainKind,
    pub stack_height: usize,
    pub building: Option<BuildingKind>,
}

impl HoveredCell {
    pub fn describe(cells: &CellCollection, id: CellId) -> Option<Self> {
        cells.get(id).map(|cell| Self {
            id,
            coord: cell.coord(),
            terrain: cell.terrain(),
            stack_height: cell.stack_height(),
            building: cell.base_kind(),
        })
    }
}

/// The two outward notifications of a dispatcher
#[derive(Debug, Default)]
pub struct SelectionSignals {
    /// Hovered cell changed, `None` when the pointer left every cell
    pub hover: Signal<Option<HoveredCell>>,
    /// A selection was committed
    pub finished: Signal<FinishedSelection>,
}
