//! CLI entry point for the scan dispatch glue.
//!
//! Provides subcommands for resolving secrets, enqueueing scan jobs, and
//! firing a scan request at the analyzer, against the same code paths the
//! orchestrator uses.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use scan_dispatch::analyzer::send_scan_request;
use scan_dispatch::aws::AwsClients;
use scan_dispatch::config::Config;
use scan_dispatch::proxy::proxy_secret;
use scan_dispatch::queue::{ScanJob, enqueue_scan_job};
use scan_dispatch::resolver::SecretResolver;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "scan_dispatch")]
#[command(about = "Secret retrieval and scan-job dispatch for the repo-scanning orchestrator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a secret and print its decoded JSON payload
    GetSecret {
        /// Secret name, or logical name when --app-scoped is set
        #[arg(value_name = "NAME")]
        name: String,

        /// Prefix the name with the configured application identifier
        #[arg(long, default_value_t = false)]
        app_scoped: bool,
    },
    /// Resolve the analyzer API key and print it
    AnalyzerKey {
        /// Logical location of the API key secret
        #[arg(value_name = "LOCATION")]
        location: String,
    },
    /// Fetch the reverse-proxy secret (cached for the process lifetime)
    ProxySecret,
    /// Enqueue one organization scan job
    Enqueue {
        /// Queue URL to submit to
        #[arg(long)]
        queue_url: String,

        /// VCS service hosting the org (e.g. "github")
        #[arg(long)]
        service: String,

        /// Organization to scan
        #[arg(long)]
        org: String,

        /// Page of the org's repository listing
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Only scan default branches
        #[arg(long, default_value_t = false)]
        default_branch_only: bool,

        /// Plugins to run, repeatable
        #[arg(long = "plugin")]
        plugins: Vec<String>,

        /// Batch this job belongs to
        #[arg(long)]
        batch_id: String,
    },
    /// Send a scan request to the analyzer
    Scan {
        /// Analyzer endpoint; falls back to ANALYZER_URL
        #[arg(long)]
        url: Option<String>,

        /// Logical location of the API key secret
        #[arg(long)]
        api_key_location: String,

        /// Request payload as inline JSON
        #[arg(value_name = "PAYLOAD")]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/scan_dispatch.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("scan_dispatch.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let aws = AwsClients::load(config.region.clone()).await;

    match cli.command {
        Commands::GetSecret { name, app_scoped } => {
            let resolver = SecretResolver::new(aws.secrets, config.application);
            let secret = if app_scoped {
                resolver.resolve_application_secret(&name).await?
            } else {
                resolver.resolve_secret(&name).await?
            };
            match secret {
                Some(secret) => println!("{}", serde_json::to_string_pretty(&secret)?),
                None => warn!(secret = %name, "no value in the secret store"),
            }
        }
        Commands::AnalyzerKey { location } => {
            let resolver = SecretResolver::new(aws.secrets, config.application);
            match resolver.analyzer_api_key(&location).await? {
                Some(key) => println!("{key}"),
                None => warn!(location = %location, "analyzer API key not configured"),
            }
        }
        Commands::ProxySecret => {
            let secret = proxy_secret(&aws.secrets, &config.rev_proxy_secret).await?;
            println!("{secret}");
        }
        Commands::Enqueue {
            queue_url,
            service,
            org,
            page,
            default_branch_only,
            plugins,
            batch_id,
        } => {
            let job = ScanJob {
                service,
                org,
                page,
                default_branch_only,
                plugins,
                batch_id,
            };
            let accepted = enqueue_scan_job(&aws.queue, &queue_url, &job).await?;
            if !accepted {
                std::process::exit(1);
            }
        }
        Commands::Scan {
            url,
            api_key_location,
            payload,
        } => {
            let url = url
                .or(config.analyzer_url)
                .context("analyzer URL not given and ANALYZER_URL not set")?;
            let payload: serde_json::Value =
                serde_json::from_str(&payload).context("payload is not valid JSON")?;

            let resolver = SecretResolver::new(aws.secrets, config.application);
            let api_key = resolver
                .analyzer_api_key(&api_key_location)
                .await?
                .ok_or_else(|| anyhow!("analyzer API key not configured at '{api_key_location}'"))?;

            let client = reqwest::Client::new();
            let response = send_scan_request(&client, &url, &api_key, &payload).await?;

            info!(status = %response.status(), "analyzer responded");
            let body = response.text().await?;
            if !body.is_empty() {
                println!("{body}");
            }
        }
    }

    Ok(())
}
