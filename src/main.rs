//! surgassist - Main CLI Entry Point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use surgassist::{
    app::{bootstrap, AppContext, Resources},
    cli::{Args, Commands},
    config::Config,
    doctor::Doctor,
    knowledge::load_knowledge_base,
    logging,
    repl::{commands::Command, execute_browse, DisplayManager, ReplSession},
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.clone())?;
    if let Some(kb) = &args.kb {
        config.knowledge_base.path = kb.to_string_lossy().into_owned();
    }
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    config.validate()?;

    let verbosity = args.verbosity();
    logging::init(verbosity, config.display.color_output);
    if !config.display.color_output {
        DisplayManager::set_color(false);
    }

    let display = DisplayManager::new()
        .with_progress(config.display.show_progress && verbosity.show_progress());

    match args.command() {
        Commands::Start => run_repl(&config, display, verbosity.show_sources()).await?,
        Commands::Ask { question } => run_ask(&config, &display, &question, verbosity.show_sources()).await?,
        Commands::Doctor => run_doctor(config).await,
        Commands::Config => show_config(&config)?,
        browse => run_browse(&config, &display, browse_command(browse)),
    }

    Ok(())
}

/// Map a browse subcommand onto the shared REPL command
fn browse_command(command: Commands) -> Command {
    match command {
        Commands::Summary => Command::Summary,
        Commands::Search { query } => Command::Search { query },
        Commands::Surgeries => Command::Surgeries,
        Commands::Complications { surgery } => Command::Complications { surgery },
        Commands::Show { surgery, complication } => Command::Show { surgery, complication },
        other => Command::Unknown {
            input: format!("{:?}", other),
        },
    }
}

/// Browse without credentials: knowledge base only
fn run_browse(config: &Config, display: &DisplayManager, command: Command) {
    let knowledge_base = match load_knowledge_base(config.knowledge_base_path()) {
        Ok(kb) => kb,
        Err(e) => {
            display.show_error(&e.to_string());
            std::process::exit(1);
        }
    };

    execute_browse(display, &knowledge_base, &command);
}

/// Initialize the full assistant once; startup failure ends the process
async fn initialize(config: &Config, display: &DisplayManager) -> Arc<Resources> {
    let mut context = AppContext::new();

    let spinner = display.spinner("Loading knowledge base and building index...");
    let result = context.initialize(|| bootstrap(config)).await;
    spinner.finish_and_clear();

    match result {
        Ok(resources) => resources,
        Err(e) => {
            display.show_error(&e.to_string());
            std::process::exit(1);
        }
    }
}

async fn run_ask(config: &Config, display: &DisplayManager, question: &str, show_sources: bool) -> Result<()> {
    let resources = initialize(config, display).await;

    let spinner = display.spinner("Searching knowledge base and generating answer...");
    let answer = resources.ask(question).await;
    spinner.finish_and_clear();

    display.show_answer(&answer, show_sources);
    Ok(())
}

async fn run_repl(config: &Config, display: DisplayManager, show_sources: bool) -> Result<()> {
    let resources = initialize(config, &display).await;

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".surgassist")
        .join("history");

    let mut session = ReplSession::with_history(resources, display, history_path)?.with_sources(show_sources);
    session.show_welcome(VERSION, &config.llm.model);
    session.run().await
}

async fn run_doctor(config: Config) {
    let doctor = Doctor::new(config);
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::overall_status(&checks) { 0 } else { 1 });
}

fn show_config(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some("********".to_string());
    }

    if let Some(path) = Config::default_path() {
        println!("# {}", path.display());
    }
    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}
