//! Cell selection for building placement.
//!
//! This module handles:
//! - The [`Dispatcher`] state machine driving the active selector
//! - The selector strategies (disabled, fixed footprint, flexible rectangle,
//!   connecting chain)
//! - Capability filters, region bounds and validity rules shared by them
//! - Relaying hover and selection-finished signals into bevy messages

pub mod bounds;
mod dispatcher;
pub mod filter;
pub mod region;
mod result;
pub mod selector;
mod signals;
mod systems;

#[cfg(test)]
mod tests;

use std::sync::{Arc, Mutex, PoisonError};

use bevy::prelude::*;

pub use dispatcher::Dispatcher;
pub use filter::{Capabilities, CellFilter};
pub use result::FinishedSelection;
pub use selector::{
    ActiveSelector, ConnectingSelector, FixedFootprintSelector, FlexibleRectangleSelector,
    connecting_neighbors,
};
pub use signals::HoveredCell;
use signals::Subscription;

/// Ordering of selection systems within `Update`
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionSet {
    /// Pointer input is fed to the dispatcher
    Input,
    /// Signals emitted during input become messages
    Relay,
}

/// The hovered cell changed (`None` = no cell under the pointer)
#[derive(Message, Debug, Clone)]
pub struct CellHovered(pub Option<HoveredCell>);

/// A selection was committed
#[derive(Message, Debug, Clone)]
pub struct SelectionFinished(pub FinishedSelection);

/// Signals collected since the last relay pass
#[derive(Default)]
struct Outbox {
    hovered: Vec<Option<HoveredCell>>,
    finished: Vec<FinishedSelection>,
}

/// The dispatcher as a bevy resource, plus the subscriptions that forward
/// its signals to the message queues
#[derive(Resource)]
pub struct SelectionState {
    pub dispatcher: Dispatcher,
    outbox: Arc<Mutex<Outbox>>,
    hover_relay: Subscription,
    finished_relay: Subscription,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(Dispatcher::default())
    }
}

impl SelectionState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let outbox: Arc<Mutex<Outbox>> = Arc::default();

        let hover_box = outbox.clone();
        let hover_relay = dispatcher.signals().hover.subscribe(move |cell| {
            hover_box
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .hovered
                .push(*cell);
        });

        let finished_box = outbox.clone();
        let finished_relay = dispatcher.signals().finished.subscribe(move |result| {
            finished_box
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .finished
                .push(result.clone());
        });

        Self {
            dispatcher,
            outbox,
            hover_relay,
            finished_relay,
        }
    }

    fn drain(&self) -> Outbox {
        std::mem::take(&mut *self.outbox.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Stop forwarding the dispatcher's signals
    fn detach(&self) {
        let signals = self.dispatcher.signals();
        signals.hover.unsubscribe(&self.hover_relay);
        signals.finished.unsubscribe(&self.finished_relay);
    }
}

impl Drop for SelectionState {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Forward signals emitted this frame as messages
fn relay_signals(
    state: Res<SelectionState>,
    mut hovered_events: MessageWriter<CellHovered>,
    mut finished_events: MessageWriter<SelectionFinished>,
) {
    let outbox = state.drain();
    for cell in outbox.hovered {
        hovered_events.write(CellHovered(cell));
    }
    for result in outbox.finished {
        finished_events.write(SelectionFinished(result));
    }
}

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionState>()
            .add_message::<CellHovered>()
            .add_message::<SelectionFinished>()
            .configure_sets(Update, (SelectionSet::Input, SelectionSet::Relay).chain())
            .add_systems(
                Update,
                (systems::handle_cursor_left, systems::handle_pointer)
                    .chain()
                    .in_set(SelectionSet::Input),
            )
            .add_systems(Update, relay_signals.in_set(SelectionSet::Relay));
    }
}
