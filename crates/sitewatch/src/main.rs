mod cli;
mod commands;
mod config;
mod error;
mod notify;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitewatch_core::Dashboard;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::notify::TerminalSink;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the network
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sitewatch", &mut std::io::stdout());
            Ok(())
        }

        Command::Sites(args) => {
            let dashboard_config = config::build_dashboard_config(&cli.global)?;
            let sink = TerminalSink::new(
                output::stderr_color(&cli.global.color),
                cli.global.quiet,
            );
            let dashboard = Dashboard::new(&dashboard_config, Arc::new(sink))?;

            tracing::debug!(command = ?args.command, "dispatching command");
            let result = commands::sites::handle(&dashboard, args, &cli.global).await;
            dashboard.close();
            result
        }
    }
}
