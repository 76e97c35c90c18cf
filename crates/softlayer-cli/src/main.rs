use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use softlayer_client::{RetryConfig, SoftLayerClient};
use softlayer_core::{LookupKey, PollConfig, ResourceKind};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sl")]
#[command(about = "Look up and wait on SoftLayer resources", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Retry reads that fail with a server error
    #[arg(long, global = true)]
    retry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a name into an id, or an id into a name
    Resolve {
        /// datacenter, routing-type, routing-method, health-check-type, regional-group
        kind: String,
        /// Name, or numeric id
        key: String,
    },
    /// Wait for the load balancer created by an order
    WaitLb {
        order_id: i64,
        /// Give up after this many seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
        /// Seconds between probes
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// DNS domain resource records
    Dns {
        #[command(subcommand)]
        command: GetCommand,
    },
    /// Provisioning hooks
    Hook {
        #[command(subcommand)]
        command: GetCommand,
    },
}

#[derive(Subcommand)]
enum GetCommand {
    /// Print a record as JSON
    Get { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve { kind, key } => {
            let kind = resource_kind(&kind)?;
            let client = connect(cli.retry)?;
            resolve(&client, &kind, &lookup_key(&key)).await
        }
        Commands::WaitLb {
            order_id,
            timeout,
            interval,
        } => wait_lb(&connect(cli.retry)?, order_id, timeout, interval).await,
        Commands::Dns {
            command: GetCommand::Get { id },
        } => print_json(&connect(cli.retry)?.dns_records().get_object(id).await?),
        Commands::Hook {
            command: GetCommand::Get { id },
        } => print_json(&connect(cli.retry)?.provisioning_hooks().get_object(id).await?),
    }
}

fn connect(retry: bool) -> anyhow::Result<SoftLayerClient> {
    let mut client = SoftLayerClient::from_env().context("Failed to load SoftLayer credentials")?;
    if retry {
        client = client.with_retry(RetryConfig::default());
    }
    tracing::debug!("Using endpoint {}", client.endpoint());
    Ok(client)
}

fn resource_kind(slug: &str) -> anyhow::Result<ResourceKind> {
    match ResourceKind::from_slug(slug) {
        Some(kind) => Ok(kind),
        None => {
            let known: Vec<&str> = ResourceKind::ALL.iter().map(|k| k.slug).collect();
            anyhow::bail!("Unknown kind '{}' (expected one of: {})", slug, known.join(", "))
        }
    }
}

/// Numeric keys are ids, anything else is a name
fn lookup_key(raw: &str) -> LookupKey {
    match raw.parse::<i64>() {
        Ok(id) => LookupKey::ById(id),
        Err(_) => LookupKey::ByName(raw.to_string()),
    }
}

async fn resolve(
    client: &SoftLayerClient,
    kind: &ResourceKind,
    key: &LookupKey,
) -> anyhow::Result<()> {
    let resolved = client.resolve(kind, key).await?;
    println!("{} {} → {}", kind.label, key.to_string().cyan(), resolved.to_string().green());
    Ok(())
}

async fn wait_lb(
    client: &SoftLayerClient,
    order_id: i64,
    timeout: Option<u64>,
    interval: Option<u64>,
) -> anyhow::Result<()> {
    let base = client.poll_config();
    let config = PollConfig::new(
        timeout.map(Duration::from_secs).unwrap_or(base.timeout()),
        interval.map(Duration::from_secs).unwrap_or(base.interval()),
    )?
    .with_initial_delay(base.initial_delay());

    println!(
        "Waiting for the load balancer of order {} (timeout {:?})...",
        order_id.to_string().cyan(),
        config.timeout()
    );

    let load_balancers = client.load_balancers();
    tokio::select! {
        result = load_balancers.find_load_balancer_by_order_id(order_id, &config) => {
            let lb = result?;
            println!("{}", format!("✓ Load balancer {} is ready", lb.id).green().bold());
            if let Some(ip) = &lb.ip_address {
                println!("  IP address: {}", ip.ip_address.cyan());
            }
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", "✗ Wait abandoned".yellow());
            anyhow::bail!("Interrupted while waiting for order {}", order_id)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_key_from_argument() {
        assert_eq!(lookup_key("265592"), LookupKey::ById(265592));
        assert_eq!(lookup_key("-1"), LookupKey::ById(-1));
        assert_eq!(lookup_key("ams01"), LookupKey::ByName("ams01".to_string()));
        assert_eq!(lookup_key("12ab"), LookupKey::ByName("12ab".to_string()));
    }

    #[test]
    fn test_resource_kind_from_slug() {
        assert_eq!(resource_kind("datacenter").unwrap().slug, "datacenter");

        let err = resource_kind("bogus").unwrap_err().to_string();
        assert!(err.contains("Unknown kind 'bogus'"));
        assert!(err.contains("regional-group"));
    }

    #[test]
    fn test_cli_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["sl", "wait-lb", "7", "--interval", "0"]).is_err());
        assert!(Cli::try_parse_from(["sl", "wait-lb", "7", "--timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["sl", "wait-lb", "7", "--interval", "5"]).is_ok());
    }
}
