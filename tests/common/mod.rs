#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use stackcodesy_auth::auth::{
    AuthenticationProvider, CredentialPrompt, Notifier, PromptOptions, SecretStore,
    SessionChangeEvent, StackCodeSyProvider, Subscription,
};
use stackcodesy_auth::config::AuthConfig;

/// A prompt that replays scripted answers in order (`None` = cancelled).
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[Option<&str>]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
            asked: Mutex::new(Vec::new()),
        })
    }

    pub fn credentials(username: &str, password: &str) -> Arc<Self> {
        Self::answering(&[Some(username), Some(password)])
    }

    pub fn times_asked(&self) -> usize {
        self.asked.lock().unwrap().len()
    }

    fn next(&self, options: PromptOptions) -> Option<String> {
        self.asked.lock().unwrap().push(options.prompt);
        self.answers.lock().unwrap().pop_front().flatten()
    }
}

#[async_trait]
impl CredentialPrompt for ScriptedPrompt {
    async fn prompt_text(&self, options: PromptOptions) -> Option<String> {
        self.next(options)
    }

    async fn prompt_secret(&self, options: PromptOptions) -> Option<String> {
        self.next(options)
    }
}

/// In-memory secret store that can be told to fail writes.
#[derive(Default)]
pub struct MemorySecrets {
    pub values: Mutex<HashMap<String, String>>,
    pub deletes: Mutex<Vec<String>>,
    pub fail_store: bool,
}

impl MemorySecrets {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_store: true,
            ..Self::default()
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.lock().unwrap().len()
    }
}

#[async_trait]
impl SecretStore for MemorySecrets {
    async fn store(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_store {
            anyhow::bail!("secret store unavailable");
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.deletes.lock().unwrap().push(key.to_string());
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warn(String),
    Error(String),
}

/// Records every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|n| match n {
                Notice::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Warn(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices.lock().unwrap().push(Notice::Error(message.to_string()));
    }
}

/// A provider plus handles on every injected fake.
pub struct Harness {
    pub provider: StackCodeSyProvider,
    pub prompt: Arc<ScriptedPrompt>,
    pub secrets: Arc<MemorySecrets>,
    pub notifier: Arc<RecordingNotifier>,
    pub events: Arc<Mutex<Vec<SessionChangeEvent>>>,
    pub subscription: Subscription,
}

impl Harness {
    pub fn new(config: AuthConfig, prompt: Arc<ScriptedPrompt>) -> Self {
        Self::with_secrets(config, prompt, MemorySecrets::new())
    }

    pub fn with_secrets(
        config: AuthConfig,
        prompt: Arc<ScriptedPrompt>,
        secrets: Arc<MemorySecrets>,
    ) -> Self {
        let notifier = RecordingNotifier::new();
        let provider = StackCodeSyProvider::new(
            config,
            prompt.clone(),
            secrets.clone(),
            notifier.clone(),
        );

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription = provider.on_did_change_sessions(Box::new(move |event: &SessionChangeEvent| {
            sink.lock().unwrap().push(event.clone());
        }));

        Self {
            provider,
            prompt,
            secrets,
            notifier,
            events,
            subscription,
        }
    }

    pub fn events(&self) -> Vec<SessionChangeEvent> {
        self.events.lock().unwrap().clone()
    }
}

pub fn scopes(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub fn production(api: &str) -> AuthConfig {
    AuthConfig {
        require_auth: true,
        auth_api_url: Some(api.to_string()),
        ..AuthConfig::default()
    }
}
