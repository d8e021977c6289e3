use hashnode_backup::{Config, run};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    info!("starting Hashnode blog backup");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "error during backup");
            return ExitCode::FAILURE;
        }
    };
    config.log_summary();

    match run(&config).await {
        Ok(summary) => {
            info!(
                posts = summary.posts,
                posts_skipped = summary.posts_skipped,
                images_saved = summary.images_saved,
                images_failed = summary.images_failed,
                "backup completed successfully"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "error during backup");
            ExitCode::FAILURE
        }
    }
}
