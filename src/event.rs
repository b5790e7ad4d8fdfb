//! Calendar events

use std::fmt::{Display, Formatter};

use bitflags::bitflags;

use crate::action::Action;
use crate::datetime::CalendarDateTime;
use crate::error::{Error, Result};

/// Identifier of an event, unique within the collection it has been created against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(u32);

impl EventId {
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}
impl From<u32> for EventId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags! {
    /// How an event repeats once it has expired.
    ///
    /// Several flags may be set, but only the most significant one is used: yearly, then monthly, then daily.
    pub struct Recurrence: u8 {
        const DAILY = 1;
        const MONTHLY = 2;
        const YEARLY = 4;
    }
}

impl Recurrence {
    pub fn from_flags(daily: bool, monthly: bool, yearly: bool) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::DAILY, daily);
        flags.set(Self::MONTHLY, monthly);
        flags.set(Self::YEARLY, yearly);
        flags
    }
}

impl Default for Recurrence {
    fn default() -> Self {
        Self::empty()
    }
}


/// A calendar event: a time, an action to fire when this time is reached, and a display name
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    id: EventId,
    time: CalendarDateTime,
    action: Action,
    name: String,
    recurrence: Recurrence,
}

impl Event {
    /// Create an event whose id follows the highest id of `collection` (or is 1 for an empty collection).
    ///
    /// The event is not inserted into `collection`, and nothing is validated here.
    pub fn new(time: CalendarDateTime, collection: &[Event], action: Action, name: String, recurrence: Recurrence) -> Self {
        let id = collection.iter()
            .map(|event| event.id.0)
            .max()
            .map(|max| max + 1)
            .unwrap_or(1);

        Self {
            id: EventId(id),
            time,
            action,
            name,
            recurrence,
        }
    }

    pub fn id(&self) -> EventId                 { self.id         }
    pub fn time(&self) -> &CalendarDateTime     { &self.time      }
    pub fn action(&self) -> Action              { self.action     }
    pub fn name(&self) -> &str                  { &self.name      }
    pub fn recurrence(&self) -> Recurrence      { self.recurrence }
    pub fn daily(&self) -> bool   { self.recurrence.contains(Recurrence::DAILY)   }
    pub fn monthly(&self) -> bool { self.recurrence.contains(Recurrence::MONTHLY) }
    pub fn yearly(&self) -> bool  { self.recurrence.contains(Recurrence::YEARLY)  }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_empty() == false
    }

    /// Replace the time of this event. An unset time is refused.
    pub fn set_time(&mut self, time: CalendarDateTime) -> Result<()> {
        if time.is_set() == false {
            return Err(Error::Validation(format!("The time of event {} must be set", self.id)));
        }
        self.time = time;
        Ok(())
    }

    pub fn set_action(&mut self, action: Action) {
        self.action = action;
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn set_daily(&mut self, daily: bool) {
        self.recurrence.set(Recurrence::DAILY, daily);
    }

    pub fn set_monthly(&mut self, monthly: bool) {
        self.recurrence.set(Recurrence::MONTHLY, monthly);
    }

    pub fn set_yearly(&mut self, yearly: bool) {
        self.recurrence.set(Recurrence::YEARLY, yearly);
    }

    /// Whether this event is due at `reference`, that is to say its time is before or equal to `reference`.
    ///
    /// Times are compared component by component, most significant first (like words in a dictionary).
    pub fn expired(&self, reference: &CalendarDateTime) -> bool {
        self.time.as_tuple() <= reference.as_tuple()
    }

    /// The time this event moves to once it has fired, or `None` for a one-shot event.
    ///
    /// See [`CalendarDateTime`] for how days past the end of a month are handled (`daily_rollover`).
    pub fn next_occurrence(&self, daily_rollover: bool) -> Result<Option<CalendarDateTime>> {
        let mut next = self.time;
        if self.yearly() {
            next.advance_year()?;
        } else if self.monthly() {
            next.advance_month()?;
        } else if self.daily() {
            next.advance_day(daily_rollover)?;
        } else {
            return Ok(None);
        }
        Ok(Some(next))
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Event #{}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Time: {}", self.time)?;
        writeln!(f, "Action: {}", self.action)?;
        writeln!(f, "Daily: {}", self.daily())?;
        writeln!(f, "Monthly: {}", self.monthly())?;
        writeln!(f, "Yearly: {}", self.yearly())
    }
}
