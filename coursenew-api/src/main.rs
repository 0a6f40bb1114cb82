use anyhow::Context;
use coursenew_api::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config)?;

    let state = AppState::from_config(config.clone());
    tracing::info!(
        users = state.users().len().await,
        "User store ready"
    );

    let app = build_router(state);

    Server::new(config).serve(app).await?;

    Ok(())
}
