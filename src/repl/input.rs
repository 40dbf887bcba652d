//! Input handler for the REPL using rustyline
//!
//! Line editing with optional persistent history.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// What a read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A trimmed line (possibly empty)
    Line(String),
    /// Ctrl-C: abandon the current line
    Interrupted,
    /// Ctrl-D: end the session
    Eof,
}

/// Readline interface with history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    pub fn new(prompt: &str) -> Result<Self> {
        Ok(InputHandler {
            editor: DefaultEditor::new()?,
            history_path: None,
            prompt: prompt.to_string(),
        })
    }

    /// Create input handler with persistent history
    pub fn with_history(prompt: &str, history_file: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;

        if history_file.exists() {
            let _ = editor.load_history(&history_file);
        }

        Ok(InputHandler {
            editor,
            history_path: Some(history_file),
            prompt: prompt.to_string(),
        })
    }

    /// Read a line of input from the user
    pub fn read_line(&mut self) -> Result<InputEvent> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed);
                }
                Ok(InputEvent::Line(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Ok(InputEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(InputEvent::Eof),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Save history to disk
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.editor.save_history(path)?;
        }
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}
