//! Status probe seam
//!
//! The streaming engine depends only on [`StatusProbe`]; production code uses
//! [`NmcliProbe`], tests drive the engine with a scripted probe.

use crate::nmcli::{self, NMCLI};
use netwatch_core::prelude::*;
use netwatch_core::State;

/// Reads the current connection state of a named interface.
///
/// Implementations never fail: any error is reported as [`State::Unknown`].
#[trait_variant::make(StatusProbe: Send)]
pub trait LocalStatusProbe {
    async fn probe(&self, interface: &str) -> State;
}

/// Probe backed by NetworkManager's `nmcli`
#[derive(Debug, Clone)]
pub struct NmcliProbe {
    tool: String,
}

impl Default for NmcliProbe {
    fn default() -> Self {
        Self {
            tool: NMCLI.to_string(),
        }
    }
}

impl NmcliProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable name or path in place of `nmcli`
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }
}

impl StatusProbe for NmcliProbe {
    async fn probe(&self, interface: &str) -> State {
        match nmcli::device_show(&self.tool, interface).await {
            Ok(output) => {
                let state = nmcli::parse_state(&output);
                if state == State::Unknown {
                    debug!("No GENERAL.STATE line for {} in {} output", interface, self.tool);
                }
                trace!("Probed {}: {}", interface, state);
                state
            }
            Err(e) => {
                debug!("Probe of {} failed: {}", interface, e);
                State::Unknown
            }
        }
    }
}
