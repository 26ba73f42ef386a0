use serde::{Deserialize, Serialize};
use std::fmt;

/// Position held in the spread
///
/// Long spread = long Y, short beta units of X. Short spread is the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignalState {
    #[default]
    Flat,
    Long,
    Short,
}

impl SignalState {
    /// Signed exposure: Flat = 0, Long = +1, Short = -1
    pub fn exposure(&self) -> i8 {
        match self {
            SignalState::Flat => 0,
            SignalState::Long => 1,
            SignalState::Short => -1,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, SignalState::Flat)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalState::Flat => "FLAT",
            SignalState::Long => "LONG",
            SignalState::Short => "SHORT",
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
