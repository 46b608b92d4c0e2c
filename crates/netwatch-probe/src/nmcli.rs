//! `nmcli` invocation and output parsing
//!
//! Runs `nmcli d show <interface>` and extracts the numeric `GENERAL.STATE`
//! code from its line-oriented output.

use netwatch_core::prelude::*;
use netwatch_core::State;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::process::Command;

/// Name of the NetworkManager command line tool
pub const NMCLI: &str = "nmcli";

/// Matches e.g. `GENERAL.STATE:                          100 (connected)`
static STATE_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^GENERAL\.STATE:\s+([0-9.]+)\s\(.+\)$").expect("Invalid state line regex")
});

/// Locate a tool on `PATH`
pub fn find_tool(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|e| {
        debug!("Lookup of '{}' failed: {}", tool, e);
        Error::tool_not_found(tool)
    })
}

/// Run `<tool> d show <interface>` and return its stdout
pub async fn device_show(tool: &str, interface: &str) -> Result<String> {
    let exec_path = find_tool(tool)?;

    let output = Command::new(&exec_path)
        .args(["d", "show", interface])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::process(format!("Failed to run {}: {}", exec_path.display(), e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::process(format!(
            "{} d show {} failed ({}): {}",
            tool,
            interface,
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extract the status code from the first `GENERAL.STATE` line.
///
/// The captured number may carry a fraction (`100.0`); only its integer part
/// counts. A capture with no usable integer part reads as code 0.
pub fn parse_state_code(output: &str) -> Option<i32> {
    output.lines().find_map(|line| {
        STATE_LINE_PATTERN.captures(line).map(|caps| {
            let raw = &caps[1];
            let integer_part = raw.split('.').next().unwrap_or_default();
            integer_part.parse::<i32>().unwrap_or(0)
        })
    })
}

/// Map `nmcli d show` output onto a state; no status line means `Unknown`.
pub fn parse_state(output: &str) -> State {
    parse_state_code(output)
        .map(State::from_code)
        .unwrap_or(State::Unknown)
}
