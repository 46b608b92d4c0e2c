//! # netwatch-probe - Interface Status Probing
//!
//! Reads the connection state of a network interface from NetworkManager's
//! `nmcli`. Every failure mode (tool missing, non-zero exit, no status line)
//! collapses into [`State::Unknown`](netwatch_core::State::Unknown); nothing
//! here returns an error to the streaming engine.
//!
//! ## Public API
//!
//! - [`StatusProbe`] - Trait seam used by the engine (`Send` futures)
//! - [`NmcliProbe`] - Production probe running `nmcli d show <interface>`
//! - [`parse_state()`] - Map `nmcli d show` output onto a state
//! - [`find_tool()`] - Locate a tool on `PATH`

pub mod nmcli;
pub mod probe;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Public API re-exports
pub use nmcli::{device_show, find_tool, parse_state, parse_state_code, NMCLI};
pub use probe::{LocalStatusProbe, NmcliProbe, StatusProbe};
