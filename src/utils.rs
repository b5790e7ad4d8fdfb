//! Some utility functions

use crate::event::Event;

/// A debug utility that pretty-prints a list of events
pub fn print_event_list<'a, I>(events: I)
where
    I: IntoIterator<Item = &'a Event>,
{
    for event in events {
        print_event(event);
    }
}

pub fn print_event(event: &Event) {
    println!("    {}", event_summary(event));
}

/// A one-line description of an event, e.g. `#3  2025.06.01 07:30:00 (Sunday)  ring  Y..  Wake up`
pub fn event_summary(event: &Event) -> String {
    let recurrence = format!("{}{}{}",
        if event.yearly()  { "Y" } else { "." },
        if event.monthly() { "M" } else { "." },
        if event.daily()   { "D" } else { "." },
    );
    format!("#{}\t{} ({})\t{}\t{}\t{}",
        event.id(), event.time(), event.time().weekday_name(), event.action(), recurrence, event.name())
}
