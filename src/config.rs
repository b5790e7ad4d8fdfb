//! Support for library configuration options

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::{Error, Result};

/// Path of the events file used when a configuration does not name one.
/// Feel free to override it when initing this library.
pub static EVENTS_FILE: Lazy<Arc<Mutex<PathBuf>>> = Lazy::new(|| Arc::new(Mutex::new(PathBuf::from("events.csv"))));

fn default_events_file() -> PathBuf {
    match EVENTS_FILE.lock() {
        Ok(path) => path.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn default_actions() -> Vec<Action> {
    Action::ALL.to_vec()
}

/// How an [`EventManager`](crate::manager::EventManager) is set up
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// The CSV file events are persisted to
    pub events_file: PathBuf,
    /// The actions events may carry. Creating an event with any other action fails.
    pub actions: Vec<Action>,
    /// Whether daily recurrence moves past the end of a month into the next one.
    /// When false, only the day number is incremented (April 30th becomes April 31st).
    pub daily_rollover: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            events_file: default_events_file(),
            actions: default_actions(),
            daily_rollover: false,
        }
    }
}

impl ManagerConfig {
    /// A default configuration that persists to `events_file`
    pub fn with_events_file(events_file: &Path) -> Self {
        Self {
            events_file: PathBuf::from(events_file),
            ..Self::default()
        }
    }

    /// Read a configuration from a JSON file. Missing keys take their default value.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|err| Error::Persistence(format!("Unable to open file {:?}: {}", path, err)))?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|err| Error::Validation(format!("Invalid configuration in {:?}: {}", path, err)))?;

        if config.actions.is_empty() {
            return Err(Error::Validation(format!("Configuration {:?} allows no action at all", path)));
        }
        Ok(config)
    }
}
