mod app;
mod render;
mod shell;

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{Parser, Subcommand};
use mood_flow::{ClientConfig, DetailRoute, ListRoute, LoadMore, check_health};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use app::App;
use shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "mood-flow", version, about = "Find movies that match your mood")]
struct Cli {
    /// Base URL of the recommendation service (overrides MOOD_FLOW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Per-request timeout in milliseconds (overrides MOOD_FLOW_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// File holding cached result pages between runs
    #[arg(long, global = true, default_value = ".mood-flow/cache.json")]
    cache_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the recommendation service is up
    Health,
    /// Search movies for a mood
    Search {
        /// Free-text mood, e.g. "rainy sunday"
        #[arg(required = true, num_args = 1..)]
        mood: Vec<String>,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Print the accumulated list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show full details for a movie
    Details {
        id: String,
        /// Mood the movie was found with; remembered for the next session
        #[arg(long, default_value = "")]
        mood: String,
        /// Print the details as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive list and detail navigation
    Shell {
        /// Mood to search for on start
        #[arg(long)]
        mood: Option<String>,
    },
}

impl Cli {
    fn config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = &self.api_url {
            config.base_url = url.clone();
        }
        if let Some(millis) = self.timeout_ms {
            anyhow::ensure!(millis > 0, "--timeout-ms must be positive");
            config.timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout stays readable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = cli.config()?;
    let app = App::new(&config, &cli.cache_file).await?;
    info!("Running {:?}", cli.command);

    match cli.command {
        Command::Health => {
            if check_health(app.api()).await {
                println!("Service at {} is up", config.base());
                Ok(ExitCode::SUCCESS)
            } else {
                println!("Service at {} is unavailable", config.base());
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Search { mood, pages, json } => search(&app, &mood.join(" "), pages, json).await,
        Command::Details { id, mood, json } => details(&app, DetailRoute { id, mood }, json).await,
        Command::Shell { mood } => {
            Shell::new(app).run(mood).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn search(app: &App, mood: &str, pages: u32, json: bool) -> anyhow::Result<ExitCode> {
    let list = app.list_view();
    if let Err(e) = list.mount(&ListRoute::for_mood(mood)).await {
        render::failure(&e);
        return Ok(ExitCode::FAILURE);
    }

    for _ in 1..pages {
        match list.load_more().await {
            Ok(LoadMore::Loaded { .. }) => {}
            Ok(LoadMore::Skipped) => break,
            Err(e) => {
                // keep what we already have
                render::failure(&e);
                break;
            }
        }
    }

    let state = list.state();
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        render::list(&state, 0, None);
    }
    Ok(ExitCode::SUCCESS)
}

async fn details(app: &App, route: DetailRoute, json: bool) -> anyhow::Result<ExitCode> {
    match app.detail_loader().open(&route).await {
        Ok(movie) if json => {
            println!("{}", serde_json::to_string_pretty(&movie)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(movie) => {
            render::details(&movie, app.image_base_url());
            println!("\nBack to the list: {}", route.back());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            render::failure(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
