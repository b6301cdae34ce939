use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reconnoiter", version, about = "Queued subdomain discovery and sensitive-path reconnaissance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML configuration file (defaults to ./reconnoiter.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// SQLite database path, overrides the config file
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl Cli {
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            config: self.config.clone(),
            db: self.db.clone(),
            quiet: self.quiet,
        }
    }
}

/// Options every subcommand can see.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<String>,
    pub db: Option<String>,
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Queue one or more domains and scan them in order
    Scan(ScanArgs),
    /// Start the HTTP API with a long-running scan queue
    Serve(ServeArgs),
    /// Show stored scan history
    History(HistoryArgs),
    /// Manage domains that are never scanned
    Ignore {
        #[command(subcommand)]
        command: IgnoreCommand,
    },
    /// Show or change persisted settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Print the root domain for a URL or hostname
    Root(RootArgs),
    /// Validate a configuration file and the wordlist it selects
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Domains or URLs to scan
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// Subdomain provider API key (or use settings / RECON_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Wordlist file or directory
    #[arg(short, long)]
    pub wordlist: Option<String>,

    /// Scan even if the domain already has history
    #[arg(long)]
    pub force: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Subdomain provider API key (or use settings / RECON_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Wordlist file or directory
    #[arg(short, long)]
    pub wordlist: Option<String>,
}

#[derive(Args, Clone)]
pub struct HistoryArgs {
    /// Show one root domain in detail
    pub domain: Option<String>,

    /// Maximum entries to list
    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Clone)]
pub enum IgnoreCommand {
    /// Add a domain (normalized to its root)
    Add { domain: String },
    /// Remove a domain
    Remove { domain: String },
    /// List ignored domains
    List,
}

#[derive(Subcommand, Clone)]
pub enum SettingsCommand {
    /// Print current settings
    Show,
    /// Set one setting: api_key, auto_scan or wordlist ("none" clears)
    Set { key: String, value: String },
}

#[derive(Args, Clone)]
pub struct RootArgs {
    pub input: String,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Configuration file to validate
    pub config: String,
}
