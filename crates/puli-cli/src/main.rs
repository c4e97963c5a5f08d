// crates/puli-cli/src/main.rs - CLI Application Entry Point
//
// ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────────┐
// │   User Input    │───▶│   CLI Parser     │───▶│  Command Handlers   │
// │ (clap commands) │    │ (main function)  │    │ (commands/*.rs)     │
// └─────────────────┘    └──────────────────┘    └─────────────────────┘
//                                 │                        │
//                                 ▼                        ▼
//                        ┌──────────────────┐    ┌─────────────────────┐
//                        │     Context      │    │  puli-core renderers│
//                        │ (config, inputs) │    │ (table, tree, ...)  │
//                        └──────────────────┘    └─────────────────────┘
//
// Handlers never print. They return a CommandOutput which main writes
// through the styler, turning style tags into colors (or stripping them).
//
// EXAMPLE USAGE:
// ```bash
// puli bind                          # All bindings, grouped by state and package
// puli bind --disabled --root        # Disabled bindings of the root package
// puli package --format "%name%"     # One package name per line
// puli tree /app                     # Resource tree below /app
// puli ls -l /app/views              # Long listing
// ```

use anyhow::Result;
use clap::Parser;
use std::io;
use tracing::Level;

mod cli;
mod commands;
mod context;
mod output;
mod services;
mod stdin;

use cli::{Cli, Commands};
use context::Context;
use output::Output;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::new(cli.project, cli.snapshot, cli.color.map(Into::into))?;

    let result = match cli.command {
        Commands::Package(args) => commands::package::handle(&ctx, args)?,
        Commands::Bind(args) => commands::bind::handle(&ctx, args)?,
        Commands::Type(args) => commands::types::handle(&ctx, args)?,
        Commands::Map(args) => commands::map::handle(&ctx, args)?,
        Commands::Tree { path } => commands::tree::handle(&ctx, &path)?,
        Commands::Ls { path, long } => commands::ls::handle(&ctx, &path, long)?,
    };

    let mut output = Output::new(io::stdout().lock(), ctx.styler());
    output.write(&result)
}

/// Log to stderr; PULI_LOG (a level name) overrides -v
fn init_tracing(verbose: u8) {
    let from_env = std::env::var("PULI_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok());
    let level = from_env.unwrap_or(match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    });

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
