use readmesmith::{
    agents::OpenAIAgent,
    api::{create_app, AppState},
    config::get_env_value,
    github::GitHubClient,
    graphics::BannerBuilder,
    logging,
    orchestrator::ReadmeService,
    output_store::ReadmeStore,
    Config,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing("info,tower_http=info")?;

    let config_path = get_env_value("READMESMITH_CONFIG").map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    config.validate().await?;

    let service = ReadmeService::new(
        GitHubClient::new(&config)?,
        Arc::new(OpenAIAgent::new(&config.llm)?),
        BannerBuilder::new(),
        ReadmeStore::new(&config.output_dir)?,
    );
    let state = AppState::new(Arc::new(service));

    info!("readmesmith server starting...");
    info!("Output directory: {}", config.output_dir.display());
    info!("Model: {} via {}", config.llm.model, config.llm.api_base);
    if config.github.token.is_none() {
        info!("No GITHUB_TOKEN set, GitHub requests are unauthenticated");
    }

    let app = create_app(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
