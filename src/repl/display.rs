//! Display manager for terminal output
//!
//! Renders the detail view, summaries and generated answers with
//! color-coded Markdown-ish styling, plus spinners for slow steps.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::browser::{ComplicationView, SearchHit};
use crate::rag::GeneratedAnswer;

const DISCLAIMER: &str = "This application is created for educational and research purposes only. \
For any medical-related help, please consult a medical professional.";

/// Display manager for CLI and REPL output
pub struct DisplayManager {
    show_progress: bool,
    prompt: String,
}

impl DisplayManager {
    pub fn new() -> Self {
        Self {
            show_progress: true,
            prompt: "surgassist> ".to_string(),
        }
    }

    /// Disable spinners (quiet mode)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Globally enable or disable ANSI colors
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str, surgeries: usize, complications: usize) {
        let width = 64;
        let rule = "=".repeat(width);
        let title = format!("  Surgical Complication Assistant {}", version);
        let info = format!(
            "  Model: {} | Surgeries: {} | Complications: {}",
            model, surgeries, complications
        );

        println!("\n{}", rule.cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", rule.cyan());
        self.show_disclaimer();
        println!(
            "Type a clinical question (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    pub fn show_disclaimer(&self) {
        println!("{} {}\n", "Disclaimer:".bold().yellow(), DISCLAIMER.italic());
    }

    /// Spinner for a slow step; hidden when progress is disabled
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Result of a keyword search: detail view on a hit, warning plus
    /// placeholder on a miss
    pub fn show_search_result(&self, query: &str, hit: Option<&SearchHit<'_>>) {
        match hit {
            Some(hit) => self.show_detail(&ComplicationView::from_hit(hit)),
            None => {
                self.show_warning(&format!(
                    "No protocol found matching '{}'. Please try different keywords or browse with /surgeries.",
                    query
                ));
                self.show_detail(&ComplicationView::placeholder());
            }
        }
    }

    pub fn show_detail(&self, view: &ComplicationView) {
        println!("{}", render_markdown(&view.to_markdown()));
    }

    pub fn show_summary(&self, summary: &str) {
        self.show_section("Available Surgeries and Complications");
        if summary.is_empty() {
            self.show_info("The knowledge base is empty.");
        } else {
            println!("{}", render_markdown(summary));
        }
    }

    /// Show generated answer, optionally followed by retrieved sources
    pub fn show_answer(&self, answer: &GeneratedAnswer, show_sources: bool) {
        self.show_section("AI Generated Response");
        println!("{}", render_markdown(&answer.text));

        if show_sources && !answer.sources.is_empty() {
            println!("\n{}", "Retrieved sources:".dimmed());
            for source in &answer.sources {
                println!("  {} {}", "•".cyan(), source.dimmed());
            }
        }
        println!();
    }

    pub fn show_list(&self, title: &str, items: &[&str]) {
        self.show_section(title);
        for (i, item) in items.iter().enumerate() {
            println!("  {}. {}", (i + 1).to_string().cyan(), item);
        }
        println!();
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    /// Show section header
    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "-".repeat(60).cyan());
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Clear screen
    pub fn clear_screen(&self) -> io::Result<()> {
        print!("\x1B[2J\x1B[1;1H");
        io::stdout().flush()
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Style Markdown headings and bullets for the terminal; other lines pass
/// through unchanged
pub fn render_markdown(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with('#') {
                let heading = trimmed.trim_start_matches('#').trim();
                format!("{}", heading.bold().cyan())
            } else if let Some(rest) = trimmed.strip_prefix("- ") {
                let indent = &line[..line.len() - trimmed.len()];
                format!("{}{} {}", indent, "•".cyan(), rest)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown_headings_and_bullets() {
        colored::control::set_override(false);

        let rendered = render_markdown("### 1. Diagnosis\n- fever\n  - Complications: Leak\nplain");
        assert_eq!(rendered, "1. Diagnosis\n• fever\n  • Complications: Leak\nplain");
    }

    #[test]
    fn test_render_markdown_empty() {
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn test_hidden_spinner_in_quiet_mode() {
        let display = DisplayManager::new().with_progress(false);
        assert!(display.spinner("working").is_hidden());
    }

    #[test]
    fn test_default_prompt() {
        assert_eq!(DisplayManager::new().prompt(), "surgassist> ");
    }
}
