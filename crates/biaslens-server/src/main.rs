//! BiasLens: media-bias dashboard backend.

use std::path::PathBuf;
use std::sync::Arc;

use biaslens_server::{evaluation, routes, validate, AppState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("BIASLENS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--validate" | "validate" => {
                let data_dir = if args.len() > 2 {
                    PathBuf::from(&args[2])
                } else {
                    resolve_data_dir()
                };
                let report = validate::validate(&data_dir);
                validate::print_report(&report);
                std::process::exit(if report.is_ok() { 0 } else { 1 });
            }
            "--help" | "-h" | "help" => {
                println!("BiasLens: media-bias dashboard backend");
                println!();
                println!("Usage: biaslens [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  validate [data-dir]      Check dataset, articles, cache and prompt");
                println!("  help                     Show this help message");
                println!();
                println!("Environment:");
                println!("  BIASLENS_DATA_DIR, PORT, BIASLENS_NODE_LIMIT,");
                println!("  BIASLENS_CLASSIFY_TIMEOUT_SECS, BIASLENS_MAX_CONCURRENCY, RUST_LOG");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'biaslens help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = biaslens_core::BiasLensConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = match AppState::bootstrap(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Refusing to start: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "Loaded dataset: {} nodes, {} links (default view {} nodes)",
        state.query.store().node_count(),
        state.query.store().link_count(),
        state.query.default_limit()
    );

    evaluation::start_evaluation_worker(state.clone());

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("BiasLens server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
