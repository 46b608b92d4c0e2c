//! Network status widget and its streaming loop
//!
//! [`NetworkModule`] ties a [`StatusProbe`], a [`Scheduler`] and a
//! [`Renderer`] together. [`NetworkModule::stream`] renders once on start, then
//! waits for whichever comes first:
//!
//! - a scheduler tick: probe again, render with the current function
//! - a renderer replacement: keep the last state, render with the new function
//!
//! Each wake-up produces exactly one output. Renders never overlap within one
//! stream. The loop runs until its future is dropped or its task aborted; the
//! renderer subscription is released on every such exit.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use netwatch_core::prelude::*;
use netwatch_core::{Output, State};
use netwatch_probe::{NmcliProbe, StatusProbe};
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::renderer::{RenderFn, Renderer, Subscription};
use crate::scheduler::{Scheduler, Ticker};
use crate::sink::Sink;

/// Loop phase, for tracing only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Rendering,
    Waiting,
}

/// What woke the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Tick,
    RendererChanged,
}

/// Connection status widget for one network interface.
///
/// Clones share the interface, probe, refresh interval and renderer, so a
/// clone can reconfigure a module that is streaming elsewhere.
pub struct NetworkModule<P = NmcliProbe, O = Output> {
    interface: Arc<str>,
    probe: Arc<P>,
    scheduler: Scheduler,
    renderer: Renderer<O>,
}

impl<P, O> Clone for NetworkModule<P, O> {
    fn clone(&self) -> Self {
        Self {
            interface: Arc::clone(&self.interface),
            probe: Arc::clone(&self.probe),
            scheduler: self.scheduler.clone(),
            renderer: self.renderer.clone(),
        }
    }
}

impl<P, O> fmt::Debug for NetworkModule<P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkModule")
            .field("interface", &self.interface)
            .field("interval", &self.scheduler.interval())
            .field("renderer", &self.renderer)
            .finish()
    }
}

impl NetworkModule {
    /// Module probing `interface` with `nmcli`, refreshing every 5 seconds
    pub fn new(interface: impl Into<String>) -> Self {
        Self::with_probe(interface, NmcliProbe::new())
    }
}

impl<P, O> NetworkModule<P, O>
where
    P: StatusProbe + Send + Sync + 'static,
    O: From<String> + Send + 'static,
{
    /// Module using a custom probe; starts with the raw-text renderer
    pub fn with_probe(interface: impl Into<String>, probe: P) -> Self {
        Self {
            interface: Arc::from(interface.into()),
            probe: Arc::new(probe),
            scheduler: Scheduler::default(),
            renderer: Renderer::default(),
        }
    }
}

impl<P, O> NetworkModule<P, O>
where
    P: StatusProbe + Send + Sync + 'static,
    O: Send + 'static,
{
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Install a rendering function; a running stream re-renders with it.
    pub fn output<F>(&self, render: F) -> &Self
    where
        F: Fn(State) -> O + Send + Sync + 'static,
    {
        debug!("Installing renderer for {}", self.interface);
        self.renderer.set(render);
        self
    }

    /// Configure the polling frequency; a running stream restarts its timer.
    pub fn refresh_interval(&self, interval: Duration) -> &Self {
        self.scheduler.every(interval);
        self
    }

    pub fn renderer(&self) -> &Renderer<O> {
        &self.renderer
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Run the streaming loop, sending every rendering to `sink`.
    ///
    /// Never returns on its own while the module is alive; stop it by dropping
    /// the future or aborting the task it runs on.
    #[instrument(skip_all, fields(interface = %self.interface))]
    pub async fn stream<S: Sink<O>>(&self, mut sink: S) {
        let mut session = EngineSession::start(self).await;
        session.render(&mut sink);

        loop {
            match session.wait().await {
                Some(Wake::Tick) => session.state = self.probe.probe(&self.interface).await,
                Some(Wake::RendererChanged) => {
                    session.render_fn = session.subscription.current();
                }
                None => {
                    session.renderer_closed = true;
                    continue;
                }
            }
            session.render(&mut sink);
        }
    }

    /// Run [`NetworkModule::stream`] on a new tokio task
    pub fn spawn<S>(&self, sink: S) -> StreamHandle
    where
        S: Sink<O> + 'static,
    {
        let module = self.clone();
        let task = tokio::spawn(async move { module.stream(sink).await });
        StreamHandle { task: Some(task) }
    }
}

impl<P> NetworkModule<P, Output>
where
    P: StatusProbe + Send + Sync + 'static,
{
    /// Apply settings: refresh interval and template renderer.
    ///
    /// The interface is fixed at construction; a different `interface` in
    /// `settings` is ignored.
    pub fn apply_settings(&self, settings: &Settings) -> &Self {
        if let Some(iface) = settings.interface.as_deref() {
            if iface != &*self.interface {
                warn!(
                    "Ignoring interface '{}' from settings, module watches '{}'",
                    iface, self.interface
                );
            }
        }
        self.refresh_interval(settings.refresh_interval());
        let renderer = settings.format.renderer(&self.interface);
        self.output(move |state| renderer.render(state))
    }
}

/// Live state of one [`NetworkModule::stream`] call.
///
/// Owns the renderer subscription; dropping the session (normal exit, future
/// dropped, task aborted) releases it.
struct EngineSession<'m, P, O> {
    module: &'m NetworkModule<P, O>,
    state: State,
    render_fn: RenderFn<O>,
    subscription: Subscription<O>,
    ticker: Ticker,
    renderer_closed: bool,
    phase: Phase,
    renders: u64,
}

impl<'m, P, O> EngineSession<'m, P, O>
where
    P: StatusProbe + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Subscribe, take the current renderer, start the ticker, probe once.
    async fn start(module: &'m NetworkModule<P, O>) -> Self {
        trace!("Stream for {} leaving {:?}", module.interface, Phase::Idle);

        // Subscribe before reading so no replacement can slip in between
        let mut subscription = module.renderer.subscribe();
        let render_fn = subscription.current();
        let ticker = module.scheduler.ticker();
        let state = module.probe.probe(&module.interface).await;
        info!("Streaming {} (initial state {})", module.interface, state);

        Self {
            module,
            state,
            render_fn,
            subscription,
            ticker,
            renderer_closed: false,
            phase: Phase::Idle,
            renders: 0,
        }
    }

    /// Emit exactly one rendering of the current state.
    fn render<S: Sink<O>>(&mut self, sink: &mut S) {
        self.phase = Phase::Rendering;
        let out = (self.render_fn)(self.state);
        sink.output(out);
        self.renders += 1;
        trace!("Render #{} for state {}", self.renders, self.state);
    }

    /// Block until the next tick or renderer replacement.
    ///
    /// `None` means the renderer slot closed; only ticks remain.
    async fn wait(&mut self) -> Option<Wake> {
        self.phase = Phase::Waiting;
        let renderer_open = !self.renderer_closed;

        tokio::select! {
            _ = self.ticker.tick() => Some(Wake::Tick),
            changed = self.subscription.changed(), if renderer_open => {
                changed.then_some(Wake::RendererChanged)
            }
        }
    }
}

impl<P, O> Drop for EngineSession<'_, P, O> {
    fn drop(&mut self) {
        debug!(
            "Stream for {} stopped in {:?} after {} render(s), last state {}",
            self.module.interface, self.phase, self.renders, self.state
        );
    }
}

/// Handle to a stream running on its own task
#[derive(Debug)]
pub struct StreamHandle {
    task: Option<JoinHandle<()>>,
}

impl StreamHandle {
    /// Abort the stream and wait until its session is dropped
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Stream task failed: {}", e);
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map(|t| t.is_finished()).unwrap_or(true)
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
