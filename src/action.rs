//! What happens when an event expires

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An action tag attached to an event.
///
/// Dispatching the action (ringing, sending a mail...) is up to the caller of
/// [`EventManager::trigger`](crate::manager::EventManager::trigger).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Ring,
    Email,
    Sms,
    Call,
    Alarm,
    Test,
}

impl Action {
    /// Every known action
    pub const ALL: [Action; 6] = [
        Action::Ring,
        Action::Email,
        Action::Sms,
        Action::Call,
        Action::Alarm,
        Action::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Ring => "ring",
            Action::Email => "email",
            Action::Sms => "sms",
            Action::Call => "call",
            Action::Alarm => "alarm",
            Action::Test => "test",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL.iter()
            .find(|action| action.as_str() == s.trim())
            .copied()
            .ok_or_else(|| Error::Validation(format!(
                "Invalid action {:?}. Valid actions: {}",
                s,
                Action::ALL.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", ")
            )))
    }
}
