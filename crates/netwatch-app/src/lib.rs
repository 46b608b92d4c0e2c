//! # netwatch-app - Rendering Engine and Configuration
//!
//! Drives a network status widget: probe an interface on a schedule, render
//! the state through a replaceable function, hand each rendering to a sink.
//!
//! ## Public API
//!
//! - [`NetworkModule`] - The widget: configure, then [`NetworkModule::stream`]
//! - [`StreamHandle`] - A stream running on its own task
//! - [`Renderer`], [`Subscription`] - Live-replaceable rendering function
//! - [`Scheduler`], [`Ticker`] - Refresh interval and per-stream tick source
//! - [`Sink`], [`TextSink`], [`JsonSink`] - Output destinations
//! - [`config`] - `config.toml` settings and template renderer
//! - [`Signals`] - SIGHUP reload / SIGINT+SIGTERM shutdown

pub mod config;
pub mod engine;
pub mod renderer;
pub mod scheduler;
pub mod signals;
pub mod sink;

pub use config::{load_settings, Settings};
pub use engine::{NetworkModule, StreamHandle};
pub use renderer::{RenderFn, Renderer, Subscription};
pub use scheduler::{
    Scheduler, Ticker, DEFAULT_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL,
};
pub use signals::{SignalAction, Signals};
pub use sink::{JsonSink, Sink, SinkEvent, TextSink};
