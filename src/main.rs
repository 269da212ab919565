use clap::Parser;
use metricrec_api::{EngineConfig, EngineContext, RestApi};
use metricrec_storage::ModelStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Metric recommendation service
#[derive(Parser, Debug)]
#[command(name = "metricrec")]
#[command(about = "Recommends software-process metrics for agile team profiles", long_about = None)]
struct Args {
    /// Directory holding the trained model artifacts
    #[arg(short, long, default_value = "./models")]
    model_dir: PathBuf,

    /// Address to bind the HTTP API to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Category affinity threshold used when a request omits one
    #[arg(long, default_value_t = 0.5)]
    threshold: f32,

    /// Neighbour count used when a request omits one
    #[arg(long, default_value_t = 5)]
    top_n: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting metricrec v{}", env!("CARGO_PKG_VERSION"));
    info!("Model directory: {:?}", args.model_dir);

    if !(0.0..=1.0).contains(&args.threshold) {
        anyhow::bail!("--threshold must lie in [0, 1], got {}", args.threshold);
    }
    if args.top_n == 0 {
        anyhow::bail!("--top-n must be positive");
    }

    // fail fast: never bind the port with a partial model set
    let models = ModelStore::new(&args.model_dir).load()?;
    let config = EngineConfig {
        threshold: args.threshold,
        top_n: args.top_n,
    };
    let context = Arc::new(EngineContext::from_models(models, config));
    info!("Engine context ready");

    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(context, host, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("metricrec started successfully");
    info!("HTTP API: http://{}:{}/", args.host, args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
