use crate::error::Result;
use crate::event::Event;
use crate::store::EventRecord;

/// Where an [`EventManager`](crate::manager::EventManager) persists its events
pub trait EventStore {
    /// Returns every well-formed record of the store, in storage order.
    ///
    /// Malformed records are skipped (and logged), they do not make the whole load fail.
    /// A store that does not exist yet is created empty.
    fn load(&mut self) -> Result<Vec<EventRecord>>;

    /// Replace the whole content of the store with `events`
    fn save(&mut self, events: &[Event]) -> Result<()>;
}
