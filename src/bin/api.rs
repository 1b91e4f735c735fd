use movie_script_studio::{api::start_server, config::StudioConfig, ScriptStudio};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = match StudioConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            error!("Set GOOGLE_API_KEY and SERP_API_KEY in .env");
            return Err(e.into());
        }
    };

    info!("Movie Script Studio - API Server");
    info!(model = %config.model, dev_mode = config.dev_mode, port = config.port, "Configuration loaded");

    let studio = ScriptStudio::from_config(&config)?;

    start_server(studio, config.port).await?;

    Ok(())
}
