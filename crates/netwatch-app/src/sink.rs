//! Display sinks
//!
//! A sink receives one rendered value per engine iteration and replaces
//! whatever it displayed before. Sinks are synchronous and never push back;
//! write failures are logged and otherwise ignored.

use std::io::{self, Write};

use chrono::Utc;
use netwatch_core::prelude::*;
use netwatch_core::Output;
use serde::Serialize;
use tokio::sync::mpsc;

/// Destination for rendered output
pub trait Sink<O>: Send {
    fn output(&mut self, out: O);
}

impl<O: Send> Sink<O> for mpsc::UnboundedSender<O> {
    fn output(&mut self, out: O) {
        if self.send(out).is_err() {
            trace!("Sink receiver dropped, output discarded");
        }
    }
}

impl<O, S: Sink<O> + ?Sized> Sink<O> for Box<S> {
    fn output(&mut self, out: O) {
        (**self).output(out);
    }
}

/// Writes each output's text as one line
#[derive(Debug)]
pub struct TextSink<W> {
    writer: W,
}

impl TextSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", text)?;
        self.writer.flush()
    }
}

impl<W: Write + Send> Sink<Output> for TextSink<W> {
    fn output(&mut self, out: Output) {
        if let Err(e) = self.write_line(&out.text) {
            error!("Failed to write output: {}", e);
        }
    }
}

/// Events emitted by [`JsonSink`], one per line
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    /// A new rendering replacing the previous one
    Output {
        text: String,
        urgent: bool,
        timestamp: i64,
    },
}

impl SinkEvent {
    pub fn output(out: Output) -> Self {
        SinkEvent::Output {
            text: out.text,
            urgent: out.urgent,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Writes NDJSON (newline-delimited JSON) events
#[derive(Debug)]
pub struct JsonSink<W> {
    writer: W,
}

impl JsonSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, event: &SinkEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Sink<Output> for JsonSink<W> {
    fn output(&mut self, out: Output) {
        if let Err(e) = self.emit(&SinkEvent::output(out)) {
            error!("Failed to emit output event: {}", e);
        }
    }
}
