//! State-change notifications for the view layer.

use tokio::sync::broadcast;

/// Emitted whenever observable engine state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// A session was established or ended.
    SessionChanged,
    /// The cart contents or its busy/error flags changed.
    CartChanged,
}

/// Send an event to whoever is listening.  A send error only means there
/// is no subscriber right now.
pub(crate) fn emit(tx: &broadcast::Sender<StateEvent>, event: StateEvent) {
    let _ = tx.send(event);
}
