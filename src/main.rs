//! VK-Harvest main entry point
//!
//! This is the command-line interface for the VK community wall harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vk_harvest::config::{load_config, validate, ClientConfig, Config, CrawlConfig};
use vk_harvest::crawler::{spawn_crawl, spawn_members, CrawlHandle, CrawlOutcome};
use vk_harvest::output::{export_all, print_summary};

/// VK-Harvest: a community wall harvester
///
/// VK-Harvest fetches a community's latest wall posts together with their
/// comments and comment threads, optionally keeps only posts mentioning a
/// keyword, and exports the flattened records as JSON, CSV and XLSX.
#[derive(Parser, Debug)]
#[command(name = "vk-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A community wall harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Access token, overriding the one in the config file
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Number of wall posts to fetch
    #[arg(long, value_name = "N")]
    count: Option<u32>,

    /// Keep only posts that mention a keyword
    #[arg(long)]
    filter: bool,

    /// Output directory, overriding the one in the config file
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// List community members instead of crawling the wall
    #[arg(long)]
    members: bool,

    /// Validate config and show what would be fetched without any requests
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully");

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config, cli.members);
        return Ok(());
    }

    let outcome = if cli.members {
        handle_members(&config).await?
    } else {
        handle_crawl(&config).await?
    };

    let base_name = base_name(&config, cli.members);
    let written = export_all(outcome.records.records(), &config.output, &base_name)
        .context("failed to export records")?;

    if !cli.quiet {
        print_summary(&outcome.summary);
        if let Some(total) = outcome.member_total {
            println!("  Community total: {}", total);
        }
        println!("\nJob fingerprint: {}", outcome.fingerprint);
        for path in &written {
            println!("✓ Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vk_harvest=info,warn"),
            1 => EnvFilter::new("vk_harvest=debug,info"),
            2 => EnvFilter::new("vk_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(token) = &cli.token {
        config.api.token = token.clone();
    }
    if let (Some(count), Some(target)) = (cli.count, config.target.as_mut()) {
        target.count = count;
    }
    if cli.filter {
        config.filter.enabled = true;
    }
    if let Some(dir) = &cli.output {
        config.output.directory = dir.clone();
    }
}

fn base_name(config: &Config, members: bool) -> String {
    if let Some(name) = &config.output.base_name {
        return name.clone();
    }
    match (&config.members, &config.target) {
        (Some(request), _) if members => format!("{}_members", request.group_id),
        (_, Some(target)) => format!("{}_data", target.domain),
        _ => "vk_data".to_string(),
    }
}

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config, members: bool) {
    println!("=== VK-Harvest Dry Run ===\n");

    println!("API:");
    println!("  Endpoint: {}", config.api.base_url);
    println!("  Version: {}", config.api.version);
    println!("  Minimum interval: {}ms", config.api.min_interval_ms);
    println!("  Timeout: {}s", config.api.timeout_secs);
    if let Some(proxy) = &config.api.proxy {
        println!("  Proxy: {}", proxy);
    }

    if members {
        match &config.members {
            Some(request) => {
                println!("\nMembers:");
                println!("  Group: {}", request.group_id);
                println!("  Count: {} (offset {})", request.count, request.offset);
            }
            None => println!("\n✗ No [members] section; --members would fail"),
        }
    } else {
        match &config.target {
            Some(target) => {
                println!("\nTarget:");
                println!("  Domain: {}", target.domain);
                println!("  Owner id: {}", target.owner_id);
                println!("  Posts: {}", target.count);
            }
            None => println!("\n✗ No [target] section; a wall crawl would fail"),
        }
        if config.filter.enabled {
            println!(
                "  Keyword filter: {}",
                config.filter.keywords_path.display()
            );
        }
    }

    let fingerprint = if members {
        let client = ClientConfig::from(&config.api);
        config.members.as_ref().map(|request| request.fingerprint(&client))
    } else {
        CrawlConfig::try_from(config).ok().map(|crawl| crawl.fingerprint())
    };
    if let Some(fingerprint) = fingerprint {
        println!("  Fingerprint: {}", fingerprint);
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Formats: {}", config.output.formats.join(", "));
    println!("  Base name: {}", base_name(config, members));

    println!("\n✓ Configuration is valid");
}

/// Handles the --members mode
async fn handle_members(config: &Config) -> anyhow::Result<CrawlOutcome> {
    let request = config
        .members
        .clone()
        .context("--members requires a [members] section in the config file")?;

    tracing::info!(
        "Listing members of {} (count {}, offset {})",
        request.group_id,
        request.count,
        request.offset
    );

    let handle = spawn_members(ClientConfig::from(&config.api), request);
    drive(handle).await
}

/// Handles the main wall crawl
async fn handle_crawl(config: &Config) -> anyhow::Result<CrawlOutcome> {
    let crawl = CrawlConfig::try_from(config)?;
    tracing::info!(
        "Crawling {} posts from {} (filter {})",
        crawl.count,
        crawl.domain,
        if crawl.filter_keywords { "on" } else { "off" }
    );

    let handle = spawn_crawl(crawl);
    drive(handle).await
}

/// Drains progress updates, then waits for the terminal result
async fn drive(mut handle: CrawlHandle) -> anyhow::Result<CrawlOutcome> {
    while let Some(percent) = handle.next_progress().await {
        tracing::info!("Progress: {}%", percent);
    }

    let outcome = handle.wait().await.context("harvest failed")?;
    tracing::info!("Harvest completed with {} records", outcome.summary.total);
    Ok(outcome)
}
