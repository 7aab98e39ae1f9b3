use clap::Parser;
use fixtures::{
    media_host::{router, MediaHostState},
    require_env_var, run_server, FixtureArgs,
};

/// Media host fixture server
#[derive(Parser, Debug)]
#[clap(name = "media-host-fixture")]
struct Cli {
    #[clap(flatten)]
    common: FixtureArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Same variables the storefront reads, so one .env drives both
    let force = args.common.force;
    let state = MediaHostState::new(
        &require_env_var("MEDIA_CLOUD_NAME", force, "fixture")?,
        &require_env_var("MEDIA_API_KEY", force, "fixture-key")?,
        &require_env_var("MEDIA_API_SECRET", force, "fixture-secret")?,
    );

    run_server(args.common, router(state)).await
}
