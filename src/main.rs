use anyhow::Result;
use clap::{Parser, Subcommand};

use cdpctl_rs::env::ProcessEnv;
use cdpctl_rs::{config, doctor, loopback, no_proxy, CdpEndpoint};

#[derive(Parser)]
#[command(name = "cdpctl-rs")]
#[command(about = "Loopback and proxy helpers for Chrome DevTools Protocol clients")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add loopback hosts to the no-proxy list when a proxy is configured
    Prime {
        /// Print the update as JSON instead of an export line
        #[arg(long)]
        json: bool,
    },
    /// Append a path to the CDP endpoint URL
    Url {
        /// Request path, with or without a leading slash
        path: String,
        /// Base URL (optional, uses the configured CDP URL)
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Check whether a host or URL points at the loopback interface
    Loopback {
        /// Hostname, IP address or URL
        target: String,
    },
    /// Show proxy variables and how loopback traffic is routed
    Status,
    /// Run diagnostics or inspect configuration state
    Doctor {
        #[command(subcommand)]
        action: Option<DoctorCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum DoctorCommands {
    /// Run diagnostics for configuration and proxy bypass
    Run,
    /// Display the effective configuration values
    Config,
}

fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cdpctl_rs=warn")),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    config::initialize_config()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Prime { json } => {
            let app_config = config::load_config()?;
            if !app_config.prime_no_proxy {
                tracing::info!("no-proxy priming disabled in configuration");
                println!("No-proxy priming disabled");
                return Ok(());
            }

            let entries = app_config.no_proxy_entries();
            let update = no_proxy::ensure_entries_in_no_proxy_with(&mut ProcessEnv, entries.as_slice());
            if json {
                println!("{}", serde_json::to_string_pretty(&update)?);
            } else {
                match update {
                    Some(update) => println!("{}", update.export_line()),
                    None => println!("# no-proxy unchanged"),
                }
            }
        }
        Commands::Url { path, base } => {
            let base = match base {
                Some(base) => base,
                None => config::get_cdp_url()?,
            };
            println!("{}", cdpctl_rs::append_cdp_path(&base, &path));
        }
        Commands::Loopback { target } => {
            let is_loopback = if target.contains("://") {
                loopback::is_loopback_url(&target)
            } else {
                loopback::is_loopback_host(&target)
            };
            let verdict = if is_loopback { "loopback" } else { "not loopback" };
            println!("{target}: {verdict}");
        }
        Commands::Status => {
            let cdp_url = config::get_cdp_url()?;
            if let Err(err) = CdpEndpoint::parse(&cdp_url) {
                tracing::warn!("{err}");
            }
            for line in doctor::status_lines(&ProcessEnv, &cdp_url) {
                println!("{line}");
            }
        }
        Commands::Doctor { action } => match action.unwrap_or(DoctorCommands::Run) {
            DoctorCommands::Run => {
                doctor::run()?;
            }
            DoctorCommands::Config => {
                doctor::print_config()?;
            }
        },
    }

    Ok(())
}
