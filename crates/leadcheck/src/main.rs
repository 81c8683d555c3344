use clap::Parser;
use leadcheck_engine::config::{ConfigLoader, RunConfig};
use leadcheck_engine::runner;
use leadcheck_wd::WebDriverBackend;
use std::path::Path;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "CRM status-filter verification", long_about = None)]
struct Args {
    /// Path to a YAML config file (defaults to ./leadcheck.yaml)
    #[arg(short, long)]
    config: Option<String>,

    /// URL of an external WebDriver server. If not provided, chromedriver
    /// is launched automatically.
    #[arg(short, long)]
    webdriver_url: Option<String>,

    /// Port for the auto-launched chromedriver
    #[arg(long, default_value_t = leadcheck_wd::driver::DEFAULT_DRIVER_PORT)]
    port: u16,

    /// Launch the browser in visible mode (not headless)
    #[arg(long)]
    visible: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// At least one status column held an unexpected value.
const EXIT_MISMATCH: i32 = 1;
/// Login, filter, search, or backend failure.
const EXIT_FATAL: i32 = 2;

async fn load_config(args: &Args) -> Result<RunConfig, leadcheck_engine::config::ConfigError> {
    match &args.config {
        Some(path) => ConfigLoader::load_from(Path::new(path)).await,
        None => ConfigLoader::load_default().await,
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(EXIT_FATAL);
        }
    };
    config.credentials.apply_env();

    let mut backend = match &args.webdriver_url {
        Some(url) => {
            info!("Using external WebDriver at {}", url);
            WebDriverBackend::with_url(url.clone())
        }
        None => WebDriverBackend::new_on_port(args.port),
    };
    backend.set_visible(args.visible);

    match runner::run(&mut backend, &config).await {
        Ok(report) => {
            println!("{}", report.summary());
            if report.all_verified() {
                info!("All statuses verified.");
            } else {
                error!("Verification found unexpected statuses.");
                std::process::exit(EXIT_MISMATCH);
            }
        }
        Err(e) => {
            error!("Run failed: {}", e);
            std::process::exit(EXIT_FATAL);
        }
    }
}
