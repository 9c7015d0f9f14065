// Terminal front end for the chat session

mod input;
mod repl;

pub use input::InputHandler;
pub use repl::{format_message, status_badge, ChatRepl, ReplCommand, QUICK_PROMPTS};
