//! The event manager keeps the list of events, persists it, and fires events when they are due

use std::collections::BTreeSet;

use crate::action::Action;
use crate::config::ManagerConfig;
use crate::datetime::CalendarDateTime;
use crate::error::{Error, Result};
use crate::event::{Event, EventId, Recurrence};
use crate::store::CsvStore;
use crate::traits::EventStore;


/// An ordered collection of [`Event`]s, mirrored into an [`EventStore`].
///
/// Every change is written to the store right away, by rewriting it entirely.
/// The manager never reads the system clock on its own: [`Self::trigger`] is given the reference time,
/// and the "current time" snapshot is only refreshed when [`Self::refresh_clock`] is called.
#[derive(Debug)]
pub struct EventManager<S = CsvStore>
where
    S: EventStore,
{
    store: S,
    /// In insertion order, which is also the storage order
    events: Vec<Event>,
    actions: Vec<Action>,
    daily_rollover: bool,
    current_time: CalendarDateTime,
}

impl EventManager<CsvStore> {
    /// Load the events of the CSV file named by `config`, or create this file if it does not exist
    pub fn open(config: &ManagerConfig) -> Result<Self> {
        let store = CsvStore::new(&config.events_file);
        Self::with_store(store, config)
    }
}

impl<S> EventManager<S>
where
    S: EventStore,
{
    /// Create a manager that loads its events from `store`.
    ///
    /// Events are renumbered `1..=N` in storage order: the ids they were saved with are not kept.
    /// Records whose action is not allowed by `config` are dropped.
    pub fn with_store(mut store: S, config: &ManagerConfig) -> Result<Self> {
        let records = store.load()?;
        let current_time = CalendarDateTime::now()?;

        let mut manager = Self {
            store,
            events: Vec::with_capacity(records.len()),
            actions: config.actions.clone(),
            daily_rollover: config.daily_rollover,
            current_time,
        };

        for record in records {
            if manager.actions.contains(&record.action()) == false {
                log::warn!("Dropping stored event {} ({:?}): action {} is not allowed", record.stored_id(), record.name(), record.action());
                continue;
            }
            let event = Event::new(*record.time(), &manager.events, record.action(), record.name().to_string(), record.recurrence());
            if event.id().as_u32() != record.stored_id() {
                log::debug!("Stored event {} is now event {}", record.stored_id(), event.id());
            }
            manager.events.push(event);
        }

        log::info!("Event manager ready with {} events", manager.events.len());
        Ok(manager)
    }

    pub fn store(&self) -> &S                       { &self.store        }
    pub fn events(&self) -> &[Event]                { &self.events       }
    pub fn actions(&self) -> &[Action]              { &self.actions      }
    pub fn daily_rollover(&self) -> bool            { self.daily_rollover }
    pub fn current_time(&self) -> &CalendarDateTime { &self.current_time }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Parse an action tag, and check it belongs to the actions this manager allows
    pub fn parse_action(&self, tag: &str) -> Result<Action> {
        let action: Action = tag.parse()?;
        self.check_action(action)?;
        Ok(action)
    }

    fn check_action(&self, action: Action) -> Result<()> {
        if self.actions.contains(&action) == false {
            let allowed: Vec<&str> = self.actions.iter().map(|a| a.as_str()).collect();
            return Err(Error::Validation(format!("Invalid action {}. Valid actions: {}", action, allowed.join(", "))));
        }
        Ok(())
    }

    /// Replace the "current time" snapshot
    pub fn set_current_time(&mut self, time: CalendarDateTime) {
        self.current_time = time;
    }

    /// Read the system clock into the "current time" snapshot
    pub fn refresh_clock(&mut self) -> Result<()> {
        self.current_time.set_now()
    }

    /// Add a new event and persist it.
    ///
    /// This is all-or-nothing: in case the store cannot be written, the event is discarded and an error is returned.
    pub fn create(&mut self, time: CalendarDateTime, action: Action, name: String, recurrence: Recurrence) -> Result<EventId> {
        if time.is_set() == false {
            return Err(Error::Validation(String::from("The time of a new event must be set")));
        }
        self.check_action(action)?;

        let event = Event::new(time, &self.events, action, name, recurrence);
        let id = event.id();
        self.events.push(event);

        if let Err(err) = self.store.save(&self.events) {
            log::warn!("Unable to save new event {}: {}. Discarding it", id, err);
            self.events.retain(|ev| ev.id() != id);
            return Err(err);
        }

        log::info!("Created event {} at {} ({})", id, time, action);
        Ok(id)
    }

    pub fn get(&self, id: EventId) -> Result<&Event> {
        self.events.iter()
            .find(|ev| ev.id() == id)
            .ok_or(Error::NotFound(id))
    }

    /// Remove an event and persist the remaining ones.
    ///
    /// In case the store cannot be written, the event is removed anyway, and an error is returned.
    /// The store is then out of date until the next successful save (see [`Self::save`]).
    pub fn remove(&mut self, id: EventId) -> Result<Event> {
        let position = self.events.iter()
            .position(|ev| ev.id() == id)
            .ok_or(Error::NotFound(id))?;
        let removed = self.events.remove(position);
        log::info!("Removed event {} ({:?})", id, removed.name());

        self.save()?;
        Ok(removed)
    }

    /// Write every event to the store
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.events).map_err(|err| {
            log::warn!("Unable to save events: {}", err);
            err
        })
    }

    /// Fire every event that is due at `reference`.
    ///
    /// Returns the (deduplicated) actions of the fired events.
    /// One-shot events are removed, recurring events are moved to their next occurrence (one step per call).
    ///
    /// Events are persisted in case anything changed. If this save fails, the error is returned but the
    /// in-memory changes are kept.
    pub fn trigger(&mut self, reference: &CalendarDateTime) -> Result<BTreeSet<Action>> {
        let mut fired = BTreeSet::new();
        let mut changed = false;
        let daily_rollover = self.daily_rollover;

        let mut i = 0;
        while i < self.events.len() {
            let event = &mut self.events[i];
            if event.expired(reference) == false {
                i += 1;
                continue;
            }

            changed = true;
            fired.insert(event.action());
            log::info!("Event {} ({:?}) is due: {}", event.id(), event.name(), event.action());

            match event.next_occurrence(daily_rollover) {
                Ok(Some(next)) => {
                    log::debug!("Event {} moved from {} to {}", event.id(), event.time(), next);
                    event.set_time(next)?;
                    i += 1;
                },
                Ok(None) => {
                    log::debug!("Event {} expired for good", event.id());
                    self.events.remove(i);
                },
                Err(err) => {
                    log::error!("Event {} cannot recur any more ({}). Removing it", event.id(), err);
                    self.events.remove(i);
                },
            }
        }

        if changed {
            if let Err(err) = self.save() {
                log::error!("Fired actions {:?} could not be persisted", fired);
                return Err(err);
            }
        }
        Ok(fired)
    }

    /// Fire every event that is due at the "current time" snapshot
    pub fn trigger_current(&mut self) -> Result<BTreeSet<Action>> {
        let reference = self.current_time;
        self.trigger(&reference)
    }
}

impl<'a, S> IntoIterator for &'a EventManager<S>
where
    S: EventStore,
{
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
