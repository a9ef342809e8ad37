use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod infrastructure;
mod paths;
mod tools;
mod ui;

use cli::{Cli, Commands};
use commands::{add, clean, list, remove, serve, setup, AppContext, Outcome};
use paths::RepoPaths;
use tools::Toolchain;
use ui::TerminalPrompter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            ui::print_error(&format!("{:#}", err));
            error::exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<Outcome> {
    let paths = RepoPaths::resolve(&cli.name, cli.base_location, cli.state_dir)?;
    let ctx = AppContext {
        paths,
        tools: Toolchain::from_env(),
        prompter: Box::new(TerminalPrompter::default()),
        token: cli.token,
    };

    match cli.command {
        Commands::Setup { config, splash } => setup::execute(&ctx, &config, splash).await,
        Commands::AddPackages { packages } => add::execute(&ctx, packages).await,
        Commands::RemovePackages { packages } => remove::execute(&ctx, packages).await,
        Commands::ListPackages { no_format } => list::execute(&ctx, no_format).await,
        Commands::Serve { port, image, stop } => serve::execute(&ctx, port, image, stop).await,
        Commands::Clean => clean::execute(&ctx).await,
    }
}
