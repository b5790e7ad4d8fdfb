//! This module stores events in a local CSV file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::datetime::CalendarDateTime;
use crate::error::{Error, Result};
use crate::event::{Event, Recurrence};
use crate::traits::EventStore;

/// The header row of every events file
pub const HEADER: [&str; 7] = ["EventID", "Zeitstempel", "Aktion", "Name", "Täglich?", "Monatlich?", "Jährlich?"];


/// The content of one row of the events file, once parsed and validated
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    stored_id: u32,
    time: CalendarDateTime,
    action: Action,
    name: String,
    recurrence: Recurrence,
}

impl EventRecord {
    pub fn new(stored_id: u32, time: CalendarDateTime, action: Action, name: String, recurrence: Recurrence) -> Self {
        Self { stored_id, time, action, name, recurrence }
    }

    /// The id this event had when it was saved. It is not reused when the event is loaded again.
    pub fn stored_id(&self) -> u32                  { self.stored_id  }
    pub fn time(&self) -> &CalendarDateTime         { &self.time      }
    pub fn action(&self) -> Action                  { self.action     }
    pub fn name(&self) -> &str                      { &self.name      }
    pub fn recurrence(&self) -> Recurrence          { self.recurrence }
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        Self::new(event.id().as_u32(), *event.time(), event.action(), event.name().to_string(), event.recurrence())
    }
}


/// A row, as it is written in the file
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    id: u32,
    /// `[year, month, day, hour, minute, second]`
    timestamp: String,
    action: String,
    name: String,
    daily: String,
    monthly: String,
    yearly: String,
}

impl CsvRow {
    fn from_event(event: &Event) -> Result<Self> {
        let time = event.time();
        let components = [
            time.year() as i64,
            time.month() as i64,
            time.day() as i64,
            time.hour() as i64,
            time.minute() as i64,
            time.second() as i64,
        ];
        let timestamp = serde_json::to_string(&components)
            .map_err(|err| Error::Persistence(format!("Unable to serialize the time of event {}: {}", event.id(), err)))?;

        Ok(Self {
            id: event.id().as_u32(),
            timestamp,
            action: event.action().to_string(),
            name: event.name().to_string(),
            daily: event.daily().to_string(),
            monthly: event.monthly().to_string(),
            yearly: event.yearly().to_string(),
        })
    }

    fn into_record(self) -> Result<EventRecord> {
        let components: Vec<i64> = serde_json::from_str(&self.timestamp)
            .map_err(|err| Error::Validation(format!("Invalid timestamp {:?}: {}", self.timestamp, err)))?;
        let time = CalendarDateTime::from_tuple(&components)?;
        let action: Action = self.action.parse()?;
        let recurrence = Recurrence::from_flags(
            parse_flag(&self.daily)?,
            parse_flag(&self.monthly)?,
            parse_flag(&self.yearly)?,
        );

        Ok(EventRecord::new(self.id, time, action, self.name, recurrence))
    }
}

/// Accepts `true`/`false` in any case (older files were written with `True`/`False`)
fn parse_flag(text: &str) -> Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::Validation(format!("Invalid recurrence flag {:?}", text))),
    }
}


/// An [`EventStore`] backed by a CSV file.
///
/// Every save rewrites the whole file. A crash in the middle of a save may leave a truncated file,
/// whose broken rows will be skipped at the next load.
#[derive(Clone, Debug, PartialEq)]
pub struct CsvStore {
    backing_file: PathBuf,
}

impl CsvStore {
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: PathBuf::from(path),
        }
    }

    /// Get the path to the backing file
    pub fn path(&self) -> &Path {
        &self.backing_file
    }

    fn create_empty_file(&self) -> Result<()> {
        log::info!("Creating an empty events file {:?}", self.backing_file);
        self.write_events(&[])
    }

    fn write_events(&self, events: &[Event]) -> Result<()> {
        let file = std::fs::File::create(&self.backing_file)
            .map_err(|err| Error::Persistence(format!("Unable to create file {:?}: {}", self.backing_file, err)))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(&HEADER)?;
        for event in events {
            writer.serialize(CsvRow::from_event(event)?)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl EventStore for CsvStore {
    fn load(&mut self) -> Result<Vec<EventRecord>> {
        let file = match std::fs::File::open(&self.backing_file) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                self.create_empty_file()?;
                return Ok(Vec::new());
            },
            Err(err) => {
                return Err(Error::Persistence(format!("Unable to open file {:?}: {}", self.backing_file, err)));
            },
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(file);

        let mut records = Vec::new();
        for (n_row, result) in reader.records().enumerate() {
            let parsed = result
                .map_err(Error::from)
                .and_then(|raw| {
                    if raw.iter().all(|field| field.trim().is_empty()) {
                        return Ok(None);
                    }
                    // Columns are matched by position, so that older header spellings are still readable
                    let row: CsvRow = raw.deserialize(None)?;
                    row.into_record().map(Some)
                });

            match parsed {
                Ok(Some(record)) => records.push(record),
                Ok(None) => continue,
                Err(err) => {
                    log::warn!("Skipping row {} of {:?}: {}", n_row + 2, self.backing_file, err);
                },
            }
        }

        log::debug!("Loaded {} events from {:?}", records.len(), self.backing_file);
        Ok(records)
    }

    fn save(&mut self, events: &[Event]) -> Result<()> {
        self.write_events(events)?;
        log::trace!("Saved {} events to {:?}", events.len(), self.backing_file);
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn sample_events() -> Vec<Event> {
        let mut events = Vec::new();
        let time = CalendarDateTime::new(2025, 3, 14, 15, 9, 26).unwrap();
        let ev = Event::new(time, &events, Action::Email, String::from("pi, day"), Recurrence::YEARLY);
        events.push(ev);
        let time = CalendarDateTime::new(2025, 12, 24, 18, 0, 0).unwrap();
        let ev = Event::new(time, &events, Action::Ring, String::from("say \"hello\""), Recurrence::DAILY | Recurrence::MONTHLY);
        events.push(ev);
        events
    }

    #[test]
    fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        let mut store = CsvStore::new(&path);
        store.save(&sample_events()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("EventID,Zeitstempel,Aktion,Name,Täglich?,Monatlich?,Jährlich?"));
        assert_eq!(lines.next(), Some("1,\"[2025,3,14,15,9,26]\",email,\"pi, day\",false,false,true"));
        assert_eq!(lines.next(), Some("2,\"[2025,12,24,18,0,0]\",ring,\"say \"\"hello\"\"\",true,true,false"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_load_saved_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        let events = sample_events();
        let mut store = CsvStore::new(&path);
        store.save(&events).unwrap();

        let records = store.load().unwrap();
        let expected: Vec<EventRecord> = events.iter().map(EventRecord::from).collect();
        assert_eq!(records, expected);
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        let mut store = CsvStore::new(&path);

        assert_eq!(store.load().unwrap(), Vec::new());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), HEADER.join(","));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.csv");
        std::fs::write(&path, concat!(
            "EventID, Zeitstempel, Aktion, Name, Täglich ?, Monatlich ?, Jährlich ?\n",
            "7,\"[2025, 1, 1, 8, 0, 0]\",ring,first,False,False,True\n",
            "8,\"[2025, 2, 30, 8, 0, 0]\",ring,invalid day,False,False,False\n",
            "9,\"[2025, 1, 1]\",ring,short timestamp,False,False,False\n",
            "10,\"[2025, 1, 1, 8, 0, 0]\",klingeln,unknown action,False,False,False\n",
            "11,\"[2025, 1, 1, 8, 0, 0]\",sms,bad flag,maybe,False,False\n",
            "\n",
            "12,\"[2025, 1, 2, 8, 0, 0]\",sms,second,true,false,false\n",
            "13,\"[2025, 1, 3, 8, 0",
        )).unwrap();

        let mut store = CsvStore::new(&path);
        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stored_id(), 7);
        assert_eq!(records[0].name(), "first");
        assert_eq!(records[0].recurrence(), Recurrence::YEARLY);
        assert_eq!(records[1].stored_id(), 12);
        assert_eq!(records[1].action(), Action::Sms);
        assert_eq!(records[1].time(), &CalendarDateTime::new(2025, 1, 2, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_unwritable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_folder").join("events.csv");
        let mut store = CsvStore::new(&path);
        assert!(store.save(&sample_events()).unwrap_err().is_persistence());
        assert!(store.load().unwrap_err().is_persistence());
    }
}
