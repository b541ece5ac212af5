use cradle_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (database, storage, services, routes)
    let (_state, router) = cradle_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    cradle_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
