use storefront::{
    routes,
    server::run_server,
    setup::{setup_sentry, setup_tracing},
    state::AppState,
};
use tracing::info;

fn main() -> color_eyre::Result<()> {
    // Initialize Sentry for error tracking
    let _sentry_guard = setup_sentry();

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()?
        .block_on(async { run_application().await })
}

async fn run_application() -> storefront::Result<()> {
    setup_tracing("storefront")?;

    let app_state = AppState::from_env().await?;
    info!(
        version = app_state.version(),
        "Storefront starting at {}",
        app_state.url("/")
    );

    if is_feature_enabled("SERVER") {
        info!("Server Enabled");
        tokio::spawn(run_server(routes::routes(app_state))).await??;
    } else {
        info!("Server Disabled");
    }

    Ok(())
}

/// Check if a feature is enabled based on environment variables
fn is_feature_enabled(feature: &str) -> bool {
    std::env::var(format!("{}_DISABLED", feature)).unwrap_or_else(|_| "false".to_string()) != "true"
}
