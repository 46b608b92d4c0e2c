//! Connection state of a network interface
//!
//! States are ordered on the same integer scale `nmcli` reports for
//! `GENERAL.STATE`, so an unrecognised code can be collapsed onto the nearest
//! known state below it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete connection state of an interface.
///
/// Ordering follows declaration order: `Unknown < Disconnected < Waiting < Connected`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// The probe could not determine anything (tool missing, failed, no status line)
    #[default]
    Unknown,
    Disconnected,
    /// Activation in progress
    Waiting,
    Connected,
}

impl State {
    pub const UNKNOWN_CODE: i32 = -1;
    pub const DISCONNECTED_CODE: i32 = 0;
    pub const WAITING_CODE: i32 = 50;
    pub const CONNECTED_CODE: i32 = 100;

    /// Map a status code reported by the tool onto a state.
    ///
    /// Total over all integers: anything other than 100 or 50 is `Disconnected`.
    /// `Unknown` is never produced here; it is reserved for probe failure.
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::CONNECTED_CODE => State::Connected,
            Self::WAITING_CODE => State::Waiting,
            _ => State::Disconnected,
        }
    }

    /// Integer value on the tool's status scale
    pub fn code(&self) -> i32 {
        match self {
            State::Unknown => Self::UNKNOWN_CODE,
            State::Disconnected => Self::DISCONNECTED_CODE,
            State::Waiting => Self::WAITING_CODE,
            State::Connected => Self::CONNECTED_CODE,
        }
    }

    pub fn is_connected(&self) -> bool {
        *self == State::Connected
    }

    /// True for `Disconnected` and also for `Unknown`.
    ///
    /// An interface whose status cannot be read is reported as down, never as
    /// up. Callers that need to tell the two apart match on the variant.
    pub fn is_disconnected(&self) -> bool {
        *self <= State::Disconnected
    }

    pub fn label(&self) -> &'static str {
        match self {
            State::Unknown => "unknown",
            State::Disconnected => "disconnected",
            State::Waiting => "waiting",
            State::Connected => "connected",
        }
    }

    pub const ALL: [State; 4] = [
        State::Unknown,
        State::Disconnected,
        State::Waiting,
        State::Connected,
    ];
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
