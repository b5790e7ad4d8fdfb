//! This module provides ways to make event stores fail on purpose during tests
#![cfg(any(test, feature = "mock_behaviour"))]

use crate::error::{Error, Result};
use crate::event::Event;
use crate::store::EventRecord;
use crate::traits::EventStore;

/// This stores some behaviour tweaks, that describe how a mocked store will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub load_behaviour: (u32, u32),
    pub save_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            load_behaviour: (0, n_fails),
            save_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_load(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.load_behaviour, "load")
    }
    pub fn can_save(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.save_behaviour, "save")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<()> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(Error::Persistence(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value)))
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}


/// An in-memory [`EventStore`], whose operations fail according to a [`MockBehaviour`]
#[derive(Default, Clone, Debug)]
pub struct MockStore {
    records: Vec<EventRecord>,
    n_saves: u32,
    behaviour: MockBehaviour,
}

impl MockStore {
    pub fn new(behaviour: MockBehaviour) -> Self {
        Self { records: Vec::new(), n_saves: 0, behaviour }
    }

    /// A store that already contains `records`
    pub fn with_records(records: Vec<EventRecord>, behaviour: MockBehaviour) -> Self {
        Self { records, n_saves: 0, behaviour }
    }

    /// What the last successful save wrote
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// How many saves succeeded
    pub fn n_saves(&self) -> u32 {
        self.n_saves
    }

    pub fn behaviour_mut(&mut self) -> &mut MockBehaviour {
        &mut self.behaviour
    }
}

impl EventStore for MockStore {
    fn load(&mut self) -> Result<Vec<EventRecord>> {
        self.behaviour.can_load()?;
        Ok(self.records.clone())
    }

    fn save(&mut self, events: &[Event]) -> Result<()> {
        self.behaviour.can_save()?;
        self.records = events.iter().map(EventRecord::from).collect();
        self.n_saves += 1;
        Ok(())
    }
}
