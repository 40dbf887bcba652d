//! REPL (Read-Eval-Print Loop) for the interactive session
//!
//! Slash commands browse the knowledge base; any other line is sent
//! through retrieval and generation.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app::Resources;
use crate::browser;
use crate::knowledge::KnowledgeBase;
use crate::repl::commands::{is_command, Command};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::{InputEvent, InputHandler};

/// Run a browse command against the knowledge base.
///
/// Returns `false` for commands that are not browse commands.
pub fn execute_browse(display: &DisplayManager, knowledge_base: &KnowledgeBase, command: &Command) -> bool {
    match command {
        Command::Summary => display.show_summary(&browser::summarize(knowledge_base)),
        Command::Search { query } => {
            let hit = browser::find_by_query(query, knowledge_base);
            display.show_search_result(query, hit.as_ref());
        }
        Command::Surgeries => {
            display.show_list("Surgeries", &browser::surgery_names(knowledge_base));
        }
        Command::Complications { surgery } => match knowledge_base.surgery(surgery) {
            Some(found) => display.show_list(
                &format!("Complications of {}", found.name),
                &browser::complication_names(found),
            ),
            None => display.show_warning(&format!("Unknown surgery '{}'", surgery)),
        },
        Command::Show { surgery, complication } => {
            match browser::select(knowledge_base, surgery, complication) {
                Some(hit) => display.show_detail(&browser::ComplicationView::from_hit(&hit)),
                None => {
                    display.show_warning(&format!(
                        "No protocol for '{}' during/after '{}'",
                        complication, surgery
                    ));
                    display.show_detail(&browser::ComplicationView::placeholder());
                }
            }
        }
        _ => return false,
    }
    true
}

/// Interactive session over initialized resources
pub struct ReplSession {
    input: InputHandler,
    display: DisplayManager,
    resources: Arc<Resources>,
    show_sources: bool,
}

impl ReplSession {
    pub fn new(resources: Arc<Resources>, display: DisplayManager) -> Result<Self> {
        let input = InputHandler::new(display.prompt())?;
        Ok(Self {
            input,
            display,
            resources,
            show_sources: false,
        })
    }

    /// Create session with persistent history
    pub fn with_history(resources: Arc<Resources>, display: DisplayManager, history_path: PathBuf) -> Result<Self> {
        let input = InputHandler::with_history(display.prompt(), history_path)?;
        Ok(Self {
            input,
            display,
            resources,
            show_sources: false,
        })
    }

    pub fn with_sources(mut self, show_sources: bool) -> Self {
        self.show_sources = show_sources;
        self
    }

    pub fn show_sources(&self) -> bool {
        self.show_sources
    }

    pub fn display(&self) -> &DisplayManager {
        &self.display
    }

    /// Show welcome banner
    pub fn show_welcome(&self, version: &str, model: &str) {
        let knowledge_base = self.resources.knowledge_base();
        self.display.show_banner(
            version,
            model,
            knowledge_base.surgeries.len(),
            knowledge_base.complication_count(),
        );
    }

    /// Main loop; returns on `/exit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.input.read_line()? {
                InputEvent::Line(line) => {
                    if !self.handle_input(&line).await? {
                        break;
                    }
                }
                InputEvent::Interrupted => {
                    println!("Use /exit to quit");
                }
                InputEvent::Eof => break,
            }
        }

        self.input.save_history()?;
        Ok(())
    }

    /// Handle one line of input.
    ///
    /// Returns true if the session should continue, false to exit.
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(true);
        }

        if !is_command(input) {
            self.answer(input).await;
            return Ok(true);
        }

        let command = commands::parse(input);
        if execute_browse(&self.display, self.resources.knowledge_base(), &command) {
            return Ok(true);
        }

        match command {
            Command::Help => commands::show_help(),
            Command::Sources { enable } => {
                self.show_sources = enable;
                self.display
                    .show_info(&format!("Sources {}", if enable { "shown" } else { "hidden" }));
            }
            Command::Clear => self.display.clear_screen()?,
            Command::Exit => {
                println!("Goodbye!");
                return Ok(false);
            }
            Command::Unknown { input } => {
                self.display
                    .show_warning(&format!("Unknown command: {} (try /help)", input));
            }
            _ => {}
        }

        Ok(true)
    }

    async fn answer(&self, question: &str) {
        let spinner = self.display.spinner("Searching knowledge base and generating answer...");
        let answer = self.resources.ask(question).await;
        spinner.finish_and_clear();

        self.display.show_answer(&answer, self.show_sources);
    }
}
