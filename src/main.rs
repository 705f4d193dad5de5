//! manifest-deploy: status service and deployment validator.
//!
//! This is the application entry point. It parses the command line,
//! initializes tracing, loads configuration from TOML, and then either runs
//! the deployment validator once or starts the status HTTP server.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use manifest_deploy::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER, PORT_ENV_VAR};
use manifest_deploy::http::start_server;
use manifest_deploy::routes::create_router;
use manifest_deploy::state::AppState;
use manifest_deploy::validate::output::{render, OutputFormat};
use manifest_deploy::validate::{validate_project, ValidatorConfig};

/// manifest-deploy: status service and deployment readiness validator
#[derive(Parser, Debug)]
#[command(name = "manifest-deploy", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "manifest_deploy=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the status and health endpoints
    Serve {
        /// Bind address (overrides http.host)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides PORT and http.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Check that the project is ready for deployment
    Validate {
        /// Project directory to validate
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn init_tracing(log_filter: &str, json: bool) {
    // Logs go to stderr so the validation report on stdout stays clean
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(log_filter));
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // An explicit config path must exist. Without one, only `serve` reads the
    // default path; `validate` never depends on the working directory's config.
    let mut config = match (&args.config, &args.command) {
        (Some(path), _) => AppConfig::load(path)?,
        (None, Command::Serve { .. }) => AppConfig::load_or_default(DEFAULT_CONFIG_PATH)?,
        (None, Command::Validate { .. }) => AppConfig::default(),
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.is_json());

    match args.command {
        Command::Validate { root, format } => {
            let summary = validate_project(&ValidatorConfig::for_root(root));
            println!("{}", render(&summary, format)?);
            Ok(if summary.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Serve { host, port } => {
            config.apply_port_override(std::env::var(PORT_ENV_VAR).ok())?;
            if let Some(host) = host {
                config.http.host = host;
            }
            if let Some(port) = port {
                config.apply_port_override(Some(port.to_string()))?;
            }

            tracing::info!(
                host = %config.http.host,
                port = config.http.port,
                "Loaded configuration"
            );

            let state = AppState::new(config.clone());
            let app = create_router(state);
            start_server(app, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
