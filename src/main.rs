use clap::Parser;
use tracing_subscriber::EnvFilter;

use reconnoiter::cli::{self, Commands};
use reconnoiter::config;
use reconnoiter::errors::ReconError;
use reconnoiter::wordlist::Wordlist;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!cli.no_color)
            .with_writer(std::io::stderr)
            .init();
    }
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let global = cli.global();
    let result = match cli.command {
        Commands::Scan(args) => cli::scan::handle_scan(args, global).await,
        Commands::Serve(args) => cli::serve::handle_serve(args, global).await,
        Commands::History(args) => cli::history::handle_history(args, global).await,
        Commands::Ignore { command } => cli::ignore::handle_ignore(command, global).await,
        Commands::Settings { command } => cli::settings::handle_settings(command, global).await,
        Commands::Root(args) => cli::root::handle_root(args),
        Commands::Validate(args) => handle_validate(args).await,
    };

    if let Err(e) = result {
        let exit_code = match &e {
            ReconError::Config(_) => 2,
            ReconError::InvalidTarget(_) => 5,
            ReconError::Cancelled => 130,
            _ => 1,
        };
        if !e.is_cancelled() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(exit_code);
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), ReconError> {
    let path = std::path::PathBuf::from(&args.config);
    let config = config::parse_config(&path).await?;
    let wordlist = Wordlist::load_or_builtin(config.wordlist.as_deref())
        .map_err(|e| ReconError::Config(e.to_string()))?;
    println!("Configuration is valid: {}", args.config);
    println!("Wordlist entries: {}", wordlist.len());
    Ok(())
}
