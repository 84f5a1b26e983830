//! A3S SiteFind CLI - find the page on a domain that contains a text fragment.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use a3s_sitefind::{
    handle_request, parse_providers, proxy::ProxyConfig, LookupConfig, ProviderKind, Resolver,
    SearchRequest,
};

/// A3S SiteFind - locate the live URL holding a text fragment
#[derive(Parser)]
#[command(name = "a3s-sitefind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the page on a domain that contains a text fragment
    Lookup(LookupArgs),

    /// Handle a raw JSON request body ({"domain": ..., "query": ...})
    Request(RequestArgs),

    /// List available search providers
    Providers,
}

#[derive(Parser)]
struct LookupArgs {
    /// Domain to search (e.g. example.com or example.com/*)
    domain: String,

    /// Text fragment to find
    query: String,

    /// Provider chain, tried in order (comma-separated)
    /// Available: ddg, google, brave, brave_api, serper, scraperapi
    #[arg(short, long, value_delimiter = ',')]
    providers: Option<Vec<String>>,

    /// Per-provider timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Language hint (e.g. en-US)
    #[arg(short, long)]
    language: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Proxy URL (e.g., http://127.0.0.1:8080 or socks5://127.0.0.1:1080)
    #[arg(long)]
    proxy: Option<String>,
}

#[derive(Parser)]
struct RequestArgs {
    /// JSON request body; read from stdin when omitted
    body: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Lookup(args) => run_lookup(args).await,
        Commands::Request(args) => run_request(args).await,
        Commands::Providers => list_providers(),
    }
}

/// Logs go to stderr so JSON on stdout stays machine-readable.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn list_providers() -> Result<()> {
    let config = LookupConfig::from_env()?;

    println!("Available search providers:\n");
    for kind in ProviderKind::all() {
        let status = match kind.credential() {
            None => "no key needed".to_string(),
            Some(key) if config.credentials.contains(key) => format!("{} set", key),
            Some(key) => format!("needs {}", key),
        };
        println!("  {:<11} - {} ({})", kind.shortcut(), kind.label(), status);
    }
    println!();
    println!(
        "Default chain: {}",
        LookupConfig::default()
            .providers
            .iter()
            .map(|k| k.shortcut())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Usage: a3s-sitefind lookup example.com \"some text\" -p ddg,google");
    Ok(())
}

async fn run_lookup(args: LookupArgs) -> Result<()> {
    let mut config = LookupConfig::from_env()?;

    if let Some(providers) = &args.providers {
        config.providers = parse_providers(&providers.join(","))?;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(language) = args.language {
        config.language = language;
    }
    if let Some(proxy_url) = &args.proxy {
        config.proxy = Some(ProxyConfig::from_url(proxy_url)?);
        if matches!(args.format, OutputFormat::Text) {
            eprintln!("Using proxy: {}", proxy_url);
        }
    }

    let resolver = Resolver::from_config(&config, config.header_policy())?;
    let request = SearchRequest::new(args.domain, args.query);
    let result = resolver.resolve(&request).await?;

    match args.format {
        OutputFormat::Text => match &result.error {
            None => {
                println!("{}", result.title);
                println!("   URL: {}", result.url);
            }
            Some(error) if result.blocked => anyhow::bail!("Blocked: {}", error),
            Some(error) => anyhow::bail!("{}", error),
        },
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

async fn run_request(args: RequestArgs) -> Result<()> {
    let body = match args.body {
        Some(body) => body,
        None => {
            let mut body = String::new();
            tokio::io::stdin()
                .read_to_string(&mut body)
                .await
                .context("Failed to read request body from stdin")?;
            body
        }
    };

    let config = LookupConfig::from_env()?;
    let resolver = Resolver::from_config(&config, config.header_policy())?;
    let response = handle_request(&resolver, &body).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
