// Readline input handler with history and editing support

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl InputHandler {
    /// Create new input handler, loading ~/.finsight/history.txt if present
    pub fn new() -> Result<Self> {
        let mut editor = DefaultEditor::new().context("Failed to initialize readline editor")?;

        let history_path = dirs::home_dir().map(|home| home.join(".finsight").join("history.txt"));

        if let Some(path) = &history_path {
            if path.exists() {
                let _ = editor.load_history(path);
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Read a line of input
    ///
    /// Returns:
    /// - `Ok(Some(line))` - user entered text
    /// - `Ok(None)` - user pressed Ctrl+C or Ctrl+D
    /// - `Err(e)` - I/O or other error
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor
                        .add_history_entry(line.as_str())
                        .context("Failed to add history entry")?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err).context("Failed to read input"),
        }
    }

    /// Save history to disk
    pub fn save_history(&mut self) -> Result<()> {
        let Some(path) = &self.history_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        self.editor
            .save_history(path)
            .with_context(|| format!("Failed to save history to {}", path.display()))?;

        Ok(())
    }
}
