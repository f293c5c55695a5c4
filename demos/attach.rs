//! Attach target resolution demonstration.
//!
//! Demonstrates:
//! - Discovery round against a running browser
//! - Target selection prompt on stdin
//! - Distinct handling of empty, cancelled and failed attempts
//!
//! Start a browser with remote debugging first, e.g.
//! `google-chrome --remote-debugging-port=9222`.
//!
//! Usage:
//!   cargo run --example attach
//!   cargo run --example attach -- 127.0.0.1:9222 http://localhost:8080
//!   cargo run --example attach -- --debug --all

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use devtools_discovery::attach::selection_items;
use devtools_discovery::{
    AttachOutcome, AttachResolver, AttachSelection, ConnectionParams, Discovery, DiscoveryTarget,
    TargetFilter, TargetPicker,
};

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    debug: bool,
    all: bool,
    address: Option<String>,
    url_filter: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut positional = args.iter().filter(|a| !a.starts_with("--")).cloned();

        Self {
            debug: args.iter().any(|a| a == "--debug"),
            all: args.iter().any(|a| a == "--all"),
            address: positional.next(),
            url_filter: positional.next(),
        }
    }

    fn connection_params(&self) -> ConnectionParams {
        let mut params = match self.address.as_deref().and_then(|a| a.rsplit_once(':')) {
            Some((host, port)) if port.parse::<u16>().is_ok() => {
                ConnectionParams::new(host).with_port(port.parse().unwrap_or_default())
            }
            _ => ConnectionParams::new(self.address.as_deref().unwrap_or("127.0.0.1")),
        };
        if let Some(filter) = &self.url_filter {
            params = params.with_url_filter(filter.clone());
        }
        params
    }
}

// ============================================================================
// StdinPicker
// ============================================================================

/// Prompts for a target number on stdin; empty input cancels.
struct StdinPicker;

#[async_trait]
impl TargetPicker for StdinPicker {
    async fn pick(&self, candidates: &[DiscoveryTarget]) -> AttachSelection {
        println!("Select a tab:");
        for (i, item) in selection_items(candidates).iter().enumerate() {
            println!("  [{}] {}\n      {}", i + 1, item.label, item.detail);
        }

        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(b"> ").await;
        let _ = stdout.flush().await;

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        if stdin.read_line(&mut line).await.is_err() {
            return AttachSelection::Cancelled;
        }

        line.trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| candidates.get(i).cloned())
            .into()
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> devtools_discovery::Result<()> {
    println!("=== Attach ===\n");

    let filter = if args.all {
        TargetFilter::any()
    } else {
        TargetFilter::pages()
    };

    let discovery = Discovery::builder()
        .request_timeout(Duration::from_secs(2))
        .filter(filter)
        .build()?;
    let params = args.connection_params();

    println!(
        "[Discover] {}:{}",
        params.host(),
        params.port().unwrap_or(discovery.options().default_port)
    );

    let outcome = AttachResolver::new()
        .with_selection_timeout(Duration::from_secs(60))
        .resolve(&discovery, &params, &StdinPicker)
        .await;

    match outcome {
        AttachOutcome::Attach(target) => {
            println!("\n[Attach] {}", target.unescaped_title);
            println!("         {}", target.endpoint());
        }
        AttachOutcome::NoTargets => println!("\n[Empty] No debuggable targets found"),
        AttachOutcome::Cancelled => println!("\n[Cancelled] Selection cancelled"),
        AttachOutcome::Failed(e) if e.is_not_running() => {
            println!("\n[Not running] Nothing is listening there yet: {e}");
        }
        AttachOutcome::Failed(e) => return Err(e),
    }

    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(debug: bool) {
    let filter = if debug {
        "devtools_discovery=trace"
    } else {
        "devtools_discovery=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
