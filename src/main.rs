//! edge_pulse - EdgeOS Router Telemetry Binary
//!
//! A standalone binary for polling an EdgeOS-style router over SSH and
//! printing the derived telemetry.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use edge_pulse::{
    ConnectionConfig, RouterCollector, TelemetrySnapshot, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_SSH_PORT,
};
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "edge_pulse")]
#[command(about = "📡 edge_pulse - EdgeOS router telemetry over SSH")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Polls a remote EdgeOS router over SSH and derives typed telemetry")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Router hostname or IP address
    #[arg(short = 'H', long)]
    host: String,

    /// SSH port
    #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
    port: u16,

    /// SSH username
    #[arg(short, long)]
    username: String,

    /// SSH password
    #[arg(short, long)]
    password: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single telemetry poll and exit (default)
    Collect(CollectArgs),

    /// Test the credentials: connect and disconnect, no data collection
    Validate,

    /// Poll repeatedly and print each snapshot
    Watch(WatchArgs),
}

#[derive(Args)]
struct CollectArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[derive(Args)]
struct WatchArgs {
    /// Polling period in seconds
    #[arg(short, long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = ConnectionConfig::new(&cli.host, &cli.username, &cli.password)
        .with_port(cli.port);
    let collector = RouterCollector::new(config)?;

    match &cli.command {
        Some(Commands::Validate) => validate_command(&collector).await?,
        Some(Commands::Watch(args)) => watch_command(&collector, args).await?,
        Some(Commands::Collect(args)) => collect_command(&collector, args).await?,
        None => {
            let args = CollectArgs {
                format: "pretty".to_string(),
            };
            collect_command(&collector, &args).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

async fn validate_command(collector: &RouterCollector) -> Result<()> {
    let host = collector.config().host.clone();
    match collector.validate().await {
        Ok(()) => {
            println!("✅ Connection to {} verified", host);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Connection to {} failed: {}", host, e);
            std::process::exit(1);
        }
    }
}

async fn collect_command(collector: &RouterCollector, args: &CollectArgs) -> Result<()> {
    info!("Polling {}...", collector.config().host);
    let snapshot = collector.collect().await?;

    match args.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&snapshot)?;
            println!("{}", json);
        }
        "pretty" => {
            print_pretty_snapshot(collector, &snapshot);
        }
        other => {
            anyhow::bail!("unsupported format: {}. Use 'json' or 'pretty'", other);
        }
    }

    Ok(())
}

async fn watch_command(collector: &RouterCollector, args: &WatchArgs) -> Result<()> {
    info!(
        "Watching {} every {}s (ctrl-c to stop)",
        collector.config().host,
        args.interval
    );

    let mut tick = tokio::time::interval(std::time::Duration::from_secs(args.interval));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tick.tick().await;
        // A failed poll is stale-but-not-absent data: report it and keep
        // the cadence, the next cycle starts from a fresh session.
        match collector.collect().await {
            Ok(snapshot) => print_pretty_snapshot(collector, &snapshot),
            Err(e) => warn!("poll failed: {}", e),
        }
    }
}

fn print_pretty_snapshot(collector: &RouterCollector, snapshot: &TelemetrySnapshot) {
    println!(
        "📡 {} ({})",
        collector.config().host,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("==========================================");
    println!();

    println!("🖥️  System:");
    println!("  Uptime: {}", snapshot.uptime);
    println!("  Firmware: {}", snapshot.firmware);
    println!();

    println!("⚡ Usage:");
    println!("  CPU: {:.1}%", snapshot.cpu_percent);
    println!("  Memory: {:.1}%", snapshot.memory_percent);
    println!();

    if !snapshot.interfaces.is_empty() {
        println!("🌐 Traffic (Mbps):");
        let mut names: Vec<&String> = snapshot.interfaces.keys().collect();
        names.sort();
        for name in names {
            let rate = &snapshot.interfaces[name];
            println!(
                "  {}: ↓ {:.2}  ↑ {:.2}",
                name, rate.rx_mbps, rate.tx_mbps
            );
        }
        println!();
    }

    println!(
        "🚨 Log errors (last {} lines): {}",
        edge_pulse::LOG_TAIL_LINES,
        snapshot.log_errors
    );
}
