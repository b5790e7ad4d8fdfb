//! This crate provides the time-keeping core of a personal calendar and alarm application.
//!
//! It provides a validated calendar date and time value in the [`datetime`] module, with the calendar arithmetic it needs (leap years, month lengths, weekdays).
//!
//! Events (a time, an [`Action`] to fire, a name and recurrence flags) are kept by an [`EventManager`], which persists them into a CSV file (see the [`store`] module). \
//! Some periodic caller (usually a GUI event loop) is expected to call [`EventManager::trigger`] about once per second, and to dispatch the actions it returns.

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod datetime;
pub use datetime::CalendarDateTime;
mod action;
pub use action::Action;
pub mod event;
pub use event::{Event, EventId, Recurrence};

pub mod traits;
pub mod store;
pub mod manager;
pub use manager::EventManager;

pub mod config;
pub mod utils;

pub mod mock_behaviour;
