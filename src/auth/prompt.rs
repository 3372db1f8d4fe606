//! Credential prompting capability supplied by the host

use async_trait::async_trait;

/// What to show alongside an input box
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub prompt: String,
    pub placeholder: Option<String>,
}

impl PromptOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Asks the user for credentials.
///
/// `None` means the user dismissed the prompt.
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    /// Free-text input
    async fn prompt_text(&self, options: PromptOptions) -> Option<String>;

    /// Masked input
    async fn prompt_secret(&self, options: PromptOptions) -> Option<String>;
}
