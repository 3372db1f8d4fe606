//! Terminal implementations of the host capabilities

use std::io::{self, BufRead, IsTerminal, Write};

use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::auth::{CredentialPrompt, Notifier, PromptOptions};

/// Prompts on stderr and reads answers from stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

#[async_trait]
impl CredentialPrompt for TerminalPrompt {
    async fn prompt_text(&self, options: PromptOptions) -> Option<String> {
        tokio::task::spawn_blocking(move || {
            write_prompt(&options);
            read_line()
        })
        .await
        .ok()
        .flatten()
    }

    async fn prompt_secret(&self, options: PromptOptions) -> Option<String> {
        tokio::task::spawn_blocking(move || {
            write_prompt(&options);
            if io::stdin().is_terminal() {
                read_masked()
            } else {
                read_line()
            }
        })
        .await
        .ok()
        .flatten()
    }
}

fn write_prompt(options: &PromptOptions) {
    let mut stderr = io::stderr();
    let _ = match &options.placeholder {
        Some(placeholder) => write!(stderr, "{} ({}): ", options.prompt, placeholder),
        None => write!(stderr, "{}: ", options.prompt),
    };
    let _ = stderr.flush();
}

/// `None` on end of input
fn read_line() -> Option<String> {
    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// Read without echo; Esc or Ctrl-C cancels
fn read_masked() -> Option<String> {
    if terminal::enable_raw_mode().is_err() {
        return read_line();
    }

    let mut secret = String::new();
    let outcome = loop {
        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(_) => break None,
        };

        match key.code {
            KeyCode::Enter => break Some(secret),
            KeyCode::Esc => break None,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break None,
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    };

    let _ = terminal::disable_raw_mode();
    eprintln!();
    outcome
}

/// Prints notifications to the console
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("warning: {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}
