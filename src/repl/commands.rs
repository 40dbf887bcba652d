//! REPL built-in commands
//!
//! Lines starting with `/` are commands; anything else is a question.

use colored::*;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Summary,
    Search { query: String },
    Surgeries,
    Complications { surgery: String },
    Show { surgery: String, complication: String },
    Sources { enable: bool },
    Clear,
    Exit,
    Unknown { input: String },
}

/// Check whether input is a command
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Parse input string into a command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let unknown = || Command::Unknown {
        input: input.to_string(),
    };

    let Some(body) = trimmed.strip_prefix('/') else {
        return unknown();
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    match name.to_lowercase().as_str() {
        "help" | "h" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "summary" | "list" => Command::Summary,
        "search" | "s" if !rest.is_empty() => Command::Search {
            query: rest.to_string(),
        },
        "surgeries" => Command::Surgeries,
        "complications" if !rest.is_empty() => Command::Complications {
            surgery: rest.to_string(),
        },
        "show" => match rest.split_once('|') {
            Some((surgery, complication))
                if !surgery.trim().is_empty() && !complication.trim().is_empty() =>
            {
                Command::Show {
                    surgery: surgery.trim().to_string(),
                    complication: complication.trim().to_string(),
                }
            }
            _ => unknown(),
        },
        "sources" => Command::Sources {
            enable: !matches!(rest.to_lowercase().as_str(), "off" | "0" | "false"),
        },
        "clear" | "cls" => Command::Clear,
        _ => unknown(),
    }
}

/// Display help information
pub fn show_help() {
    println!("\n{}", "Available Commands:".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    let commands = [
        ("/help, /h", "Show this help message"),
        ("/summary, /list", "List all surgeries and complications"),
        ("/search <keyword>", "Find a protocol by surgery or complication name"),
        ("/surgeries", "List surgery names"),
        ("/complications <surgery>", "List complications of a surgery"),
        ("/show <surgery> | <complication>", "Show one protocol"),
        ("/sources [on|off]", "Toggle display of retrieved sources"),
        ("/clear, /cls", "Clear screen"),
        ("/exit, /quit, /q", "Exit"),
    ];

    for (cmd, desc) in commands {
        println!("  {:<36} {}", cmd.green(), desc);
    }

    println!("\nAny other input is answered from the knowledge base.\n");
}
