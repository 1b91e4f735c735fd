use clap::Parser;
use movie_script_studio::{
    config::StudioConfig,
    models::{Audience, Genre, MovieRequest, Runtime},
    DetailPanel, Rendered, ScriptStudio,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate a movie script outline and casting suggestions from the terminal
#[derive(Debug, Parser)]
#[command(name = "studio", version)]
struct Cli {
    /// The plot idea, a few sentences will do
    #[arg(long, default_value = "")]
    idea: String,

    /// Action, Comedy, Horror, Romance, Sci-Fi, Thriller or Drama
    #[arg(long, default_value = "Drama")]
    genre: Genre,

    /// General, Children, Teens, Adults or Mature
    #[arg(long, default_value = "General")]
    audience: Audience,

    /// Runtime in minutes (60-180)
    #[arg(long, default_value_t = Runtime::DEFAULT)]
    runtime: u16,

    /// Show provider error details even outside developer mode
    #[arg(long)]
    show_error_details: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = StudioConfig::from_env()?;

    let request = MovieRequest {
        idea: cli.idea,
        genre: cli.genre,
        audience: cli.audience,
        runtime: Runtime::try_from(cli.runtime)?,
    };

    info!(genre = %request.genre, audience = %request.audience, "Running studio");

    let studio = ScriptStudio::from_config(&config)?;
    let rendered = studio.generate(&request, cli.show_error_details).await;

    match rendered {
        Rendered::Content { text } => println!("{}", text),
        Rendered::Error { message, detail } => {
            eprintln!("{}", message);
            match detail {
                Some(DetailPanel::Json(body)) | Some(DetailPanel::Raw(body)) => {
                    eprintln!("\n--- technical details ---\n{}", body);
                }
                None => {}
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
