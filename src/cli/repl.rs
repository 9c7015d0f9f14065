// Interactive chat REPL
//
// Thin presentation layer over ChatSession. Renders the transcript, the
// server status badge and the thinking indicator, and applies the send gate.

use anyhow::Result;
use chrono::Local;
use std::io::{self, BufRead, IsTerminal, Write};

use super::input::InputHandler;
use crate::client::{ChatApi, ServerStatus};
use crate::errors::connection_refused_error;
use crate::session::{ChatMessage, ChatSession, Role, SubmitOutcome};

/// Sample questions offered by /quick
pub const QUICK_PROMPTS: &[&str] = &[
    "Hello, I need financial advice",
    "I want a $250,000 home loan",
    "How to invest $50,000 at age 30?",
    "Improve my 620 credit score",
    "Create budget for $8000 income",
    "Best credit card for beginners",
];

/// Parsed REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    Help,
    Status,
    Info,
    History,
    /// `/quick` lists prompts, `/quick n` sends the nth (1-based)
    Quick(Option<usize>),
    Unknown(String),
    Message(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ReplCommand::Empty;
        }
        if !trimmed.starts_with('/') {
            return ReplCommand::Message(line.to_string());
        }

        let mut parts = trimmed.split_whitespace();
        let command = parts.next().unwrap_or_default();
        match command {
            "/exit" | "/quit" => ReplCommand::Exit,
            "/help" => ReplCommand::Help,
            "/status" | "/refresh" => ReplCommand::Status,
            "/info" => ReplCommand::Info,
            "/history" => ReplCommand::History,
            "/quick" => match parts.next() {
                None => ReplCommand::Quick(None),
                Some(n) => match n.parse::<usize>() {
                    Ok(n) => ReplCommand::Quick(Some(n)),
                    Err(_) => ReplCommand::Unknown(trimmed.to_string()),
                },
            },
            _ => ReplCommand::Unknown(trimmed.to_string()),
        }
    }
}

/// Badge shown next to the prompt
pub fn status_badge(status: ServerStatus) -> &'static str {
    match status {
        ServerStatus::Checking => "🟡 Checking",
        ServerStatus::Online => "🟢 Online",
        ServerStatus::Offline => "🔴 Offline",
    }
}

/// One transcript line: "[12:34:56] you: text"
pub fn format_message(message: &ChatMessage) -> String {
    let who = match message.role() {
        Role::User => "you",
        Role::Assistant => "ai",
    };
    format!(
        "[{}] {}: {}",
        message.sent_at().with_timezone(&Local).format("%H:%M:%S"),
        who,
        message.text()
    )
}

pub struct ChatRepl<A: ChatApi + ?Sized> {
    session: ChatSession<A>,
    base_url: String,
    input_handler: Option<InputHandler>,
}

impl<A: ChatApi + ?Sized> ChatRepl<A> {
    pub fn new(session: ChatSession<A>, base_url: impl Into<String>) -> Self {
        let input_handler = if io::stdin().is_terminal() {
            match InputHandler::new() {
                Ok(handler) => Some(handler),
                Err(e) => {
                    eprintln!("Failed to initialize input handler: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            session,
            base_url: base_url.into(),
            input_handler,
        }
    }

    /// Run interactive REPL loop
    pub async fn run_interactive(mut self, initial_prompt: Option<String>) -> Result<()> {
        println!("FinSight AI Assistant");
        println!("Type /help for commands, /exit to quit");

        let status = self.session.refresh_status().await;
        self.print_status(status);

        if let Some(prompt) = initial_prompt {
            self.send(&prompt).await;
        }

        loop {
            let prompt = format!("{} > ", status_badge(self.session.server_status()));
            let line = match &mut self.input_handler {
                Some(handler) => match handler.read_line(&prompt) {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        eprintln!("Input error: {}", e);
                        continue;
                    }
                },
                None => {
                    print!("{}", prompt);
                    io::stdout().flush()?;
                    let mut line = String::new();
                    if io::stdin().lock().read_line(&mut line)? == 0 {
                        break;
                    }
                    line.trim_end_matches(['\r', '\n']).to_string()
                }
            };

            match ReplCommand::parse(&line) {
                ReplCommand::Empty => continue,
                ReplCommand::Exit => break,
                ReplCommand::Help => Self::show_help(),
                ReplCommand::Status => {
                    println!("Checking server...");
                    let status = self.session.refresh_status().await;
                    self.print_status(status);
                }
                ReplCommand::Info => self.show_agent_info().await,
                ReplCommand::History => self.show_history(),
                ReplCommand::Quick(None) => {
                    for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
                        println!("  {}. {}", i + 1, prompt);
                    }
                }
                ReplCommand::Quick(Some(n)) => match n.checked_sub(1).and_then(|i| QUICK_PROMPTS.get(i)) {
                    Some(prompt) => {
                        println!("you: {}", prompt);
                        self.send(prompt).await;
                    }
                    None => eprintln!("No quick prompt #{} (1-{})", n, QUICK_PROMPTS.len()),
                },
                ReplCommand::Unknown(command) => {
                    eprintln!("Unknown command: {}", command);
                    eprintln!("Type /help for available commands");
                }
                ReplCommand::Message(text) => self.send(&text).await,
            }
        }

        if let Some(handler) = &mut self.input_handler {
            if let Err(e) = handler.save_history() {
                eprintln!("Failed to save history: {}", e);
            }
        }
        println!("Goodbye!");
        Ok(())
    }

    async fn send(&self, text: &str) {
        if !self.session.can_send(text) {
            if self.session.server_status() == ServerStatus::Offline {
                eprintln!("{}", connection_refused_error(&self.base_url));
            } else if self.session.is_loading() {
                eprintln!("Still waiting for the previous reply");
            }
            return;
        }

        println!("🤔 Thinking...");
        match self.session.submit(text).await {
            SubmitOutcome::Replied(_) => {
                let transcript = self.session.transcript();
                if let Some(message) = transcript.last() {
                    println!("{}", format_message(message));
                }
            }
            SubmitOutcome::Failed(_) => {
                let state = self.session.snapshot();
                if let Some(response) = &state.response {
                    println!("ai: {}", response);
                }
                if let Some(error) = &state.error {
                    eprintln!("Error: {}", error);
                }
            }
            SubmitOutcome::Ignored => {}
        }
    }

    fn print_status(&self, status: ServerStatus) {
        println!("Server {}: {}", self.base_url, status_badge(status));
        if status == ServerStatus::Offline {
            eprintln!("{}", connection_refused_error(&self.base_url));
        }
    }

    async fn show_agent_info(&self) {
        let Some(info) = self.session.get_agent_info().await else {
            eprintln!("Failed to get agent info");
            return;
        };

        if let Some(name) = info.name() {
            println!("Agent: {}", name);
        }
        if let Some(description) = info.description() {
            println!("{}", description);
        }
        let capabilities = info.capabilities();
        if capabilities.is_empty() {
            match serde_json::to_string_pretty(info.as_map()) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to render agent info: {}", e),
            }
        } else {
            println!("Capabilities:");
            for capability in capabilities {
                println!("  • {}", capability);
            }
        }
    }

    fn show_history(&self) {
        let transcript = self.session.transcript();
        println!("Conversation history ({} messages):", transcript.len());
        for message in transcript.iter() {
            println!("  {}", format_message(message));
        }
    }

    fn show_help() {
        println!("Commands:");
        println!("  /status     Refresh server status");
        println!("  /info       Show agent information");
        println!("  /history    Show this session's transcript");
        println!("  /quick [n]  List sample questions, or send number n");
        println!("  /exit       Quit");
        println!("Anything else is sent to the assistant.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Exit);
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Exit);
        assert_eq!(ReplCommand::parse("  /help "), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/status"), ReplCommand::Status);
        assert_eq!(ReplCommand::parse("/info"), ReplCommand::Info);
        assert_eq!(ReplCommand::parse("/history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse("/quick"), ReplCommand::Quick(None));
        assert_eq!(ReplCommand::parse("/quick 3"), ReplCommand::Quick(Some(3)));
        assert_eq!(
            ReplCommand::parse("/quick three"),
            ReplCommand::Unknown("/quick three".to_string())
        );
        assert_eq!(
            ReplCommand::parse("/bogus"),
            ReplCommand::Unknown("/bogus".to_string())
        );
    }

    #[test]
    fn test_parse_messages() {
        assert_eq!(ReplCommand::parse(""), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("   \t"), ReplCommand::Empty);
        assert_eq!(
            ReplCommand::parse("How to invest $50,000?"),
            ReplCommand::Message("How to invest $50,000?".to_string())
        );
    }

    #[test]
    fn test_status_badges() {
        assert_eq!(status_badge(ServerStatus::Online), "🟢 Online");
        assert_eq!(status_badge(ServerStatus::Offline), "🔴 Offline");
        assert_eq!(status_badge(ServerStatus::Checking), "🟡 Checking");
    }

    #[test]
    fn test_format_message_labels_roles() {
        let user = format_message(&ChatMessage::user("Hello"));
        assert!(user.ends_with("you: Hello"));

        let ai = format_message(&ChatMessage::assistant("Hi there"));
        assert!(ai.ends_with("ai: Hi there"));
    }
}
