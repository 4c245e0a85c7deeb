//! Server status shown in the header

use crate::protocol::StatusUpdate;

/// Latest model/provider/tool information reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Prompt caching enabled on the backend
    pub caching: bool,
    pub tools: Option<u64>,
}

impl StatusInfo {
    /// Apply a status report.
    ///
    /// Provider, model and caching change together and only when both
    /// provider and model are present; the tool count changes on its own.
    pub fn apply(&mut self, update: &StatusUpdate) {
        let provider = non_empty(&update.provider);
        let model = non_empty(&update.model);
        if let (Some(provider), Some(model)) = (provider, model) {
            self.provider = Some(provider.to_string());
            self.model = Some(model.to_string());
            self.caching = update.caching;
        }
        if let Some(tools) = update.tools {
            self.tools = Some(tools);
        }
    }

    /// `"<provider> - <model>"`, with a rocket when caching is on
    pub fn model_label(&self) -> Option<String> {
        let (provider, model) = (self.provider.as_ref()?, self.model.as_ref()?);
        let mut label = format!("{provider} - {model}");
        if self.caching {
            label.push_str(" 🚀");
        }
        Some(label)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(
        provider: Option<&str>,
        model: Option<&str>,
        caching: bool,
        tools: Option<u64>,
    ) -> StatusUpdate {
        StatusUpdate {
            provider: provider.map(String::from),
            model: model.map(String::from),
            caching,
            tools,
            message: None,
        }
    }

    #[test]
    fn test_full_update() {
        let mut status = StatusInfo::default();
        status.apply(&update(Some("anthropic"), Some("claude"), true, Some(12)));
        assert_eq!(status.model_label().as_deref(), Some("anthropic - claude 🚀"));
        assert_eq!(status.tools, Some(12));
    }

    #[test]
    fn test_partial_update_keeps_model() {
        let mut status = StatusInfo::default();
        status.apply(&update(Some("openai"), Some("gpt-4o"), false, None));
        status.apply(&update(Some("other"), None, true, Some(0)));

        assert_eq!(status.model_label().as_deref(), Some("openai - gpt-4o"));
        assert_eq!(status.tools, Some(0));
    }

    #[test]
    fn test_no_label_until_reported() {
        assert_eq!(StatusInfo::default().model_label(), None);
    }
}
