//! Renderable output handed to a display sink

use serde::Serialize;

/// A single rendered segment of the widget.
///
/// The streaming engine never looks inside this; only sinks do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Output {
    /// Text shown on the display
    pub text: String,

    /// Whether the display should draw attention to this output
    #[serde(default)]
    pub urgent: bool,
}

impl Output {
    /// Plain, non-urgent text output
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            urgent: false,
        }
    }

    pub fn urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<String> for Output {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&str> for Output {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}
