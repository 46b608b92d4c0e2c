//! OS signal handling for reload and graceful shutdown

use netwatch_core::prelude::*;

/// What a received signal asks the widget to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// Re-read settings and swap the renderer (SIGHUP)
    Reload,
    /// Stop streaming and exit (SIGINT, SIGTERM, Ctrl+C)
    Shutdown,
}

/// Registered signal listeners.
///
/// Listeners are created once so signals arriving between two
/// [`Signals::recv`] calls are not lost.
pub struct Signals {
    #[cfg(unix)]
    sighup: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
}

impl Signals {
    pub fn new() -> Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let sighup = signal(SignalKind::hangup())
                .map_err(|e| Error::signal(format!("Failed to create SIGHUP handler: {}", e)))?;
            let sigint = signal(SignalKind::interrupt())
                .map_err(|e| Error::signal(format!("Failed to create SIGINT handler: {}", e)))?;
            let sigterm = signal(SignalKind::terminate())
                .map_err(|e| Error::signal(format!("Failed to create SIGTERM handler: {}", e)))?;

            Ok(Self {
                sighup,
                sigint,
                sigterm,
            })
        }

        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> SignalAction {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.sighup.recv() => {
                    info!("Received SIGHUP");
                    SignalAction::Reload
                }
                _ = self.sigint.recv() => {
                    info!("Received SIGINT");
                    SignalAction::Shutdown
                }
                _ = self.sigterm.recv() => {
                    info!("Received SIGTERM");
                    SignalAction::Shutdown
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
            } else {
                info!("Received Ctrl+C");
            }
            SignalAction::Shutdown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signals_register() {
        assert!(Signals::new().is_ok());
    }
}
