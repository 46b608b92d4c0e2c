//! Test utilities for driving the engine without `nmcli`
//!
//! [`ScriptedProbe`] returns states from a queue and counts every call, so
//! tests can assert exactly how many probes a stream performed.

use crate::probe::StatusProbe;
use netwatch_core::State;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Probe returning queued states, then repeating a fallback.
///
/// Clones share the queue and the call counter.
#[derive(Debug, Clone)]
pub struct ScriptedProbe {
    script: Arc<Mutex<VecDeque<State>>>,
    fallback: State,
    calls: Arc<AtomicUsize>,
    interfaces: Arc<Mutex<Vec<String>>>,
    delay: Duration,
}

impl ScriptedProbe {
    /// Creates a probe that always reports `state`.
    pub fn constant(state: State) -> Self {
        Self::new(Vec::new(), state)
    }

    /// Creates a probe that reports `script` in order, then `fallback` forever.
    pub fn new(script: impl IntoIterator<Item = State>, fallback: State) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            fallback,
            calls: Arc::new(AtomicUsize::new(0)),
            interfaces: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Make every probe take `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Append a state to the script
    pub fn push(&self, state: State) {
        self.script
            .lock()
            .expect("script lock poisoned")
            .push_back(state);
    }

    /// Number of probes performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Interface names passed to each probe, in call order
    pub fn interfaces(&self) -> Vec<String> {
        self.interfaces
            .lock()
            .expect("interfaces lock poisoned")
            .clone()
    }
}

impl StatusProbe for ScriptedProbe {
    async fn probe(&self, interface: &str) -> State {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.interfaces
            .lock()
            .expect("interfaces lock poisoned")
            .push(interface.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or(self.fallback)
    }
}
