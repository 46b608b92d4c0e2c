//! Template-based rendering function built from `[format]` settings

use netwatch_core::{Output, State};

use super::types::FormatSettings;

/// Renders a state by filling the matching template.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    interface: String,
    format: FormatSettings,
}

impl TemplateRenderer {
    pub fn new(interface: impl Into<String>, format: FormatSettings) -> Self {
        Self {
            interface: interface.into(),
            format,
        }
    }

    pub fn render(&self, state: State) -> Output {
        let template = match state {
            State::Connected => &self.format.connected,
            State::Waiting => &self.format.waiting,
            State::Disconnected => &self.format.disconnected,
            State::Unknown => &self.format.unknown,
        };

        let text = template
            .replace("{iface}", &self.interface)
            .replace("{state}", state.label())
            .replace("{code}", &state.code().to_string());

        Output::text(text).urgent(self.format.urgent_when_disconnected && state.is_disconnected())
    }
}

impl FormatSettings {
    /// Rendering function for `interface` using these templates
    pub fn renderer(&self, interface: &str) -> TemplateRenderer {
        TemplateRenderer::new(interface, self.clone())
    }
}
