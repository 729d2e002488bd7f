use clap::{ArgAction, Parser, Subcommand};
use cinemate_config::{Config, PathManager};
use cinemate_models::{HistoryAction, MovieId};
use color_eyre::eyre::eyre;
use commands::lists::ListKind;
use commands::prefs::PrefsUpdate;
use commands::{config, history, lists, movies, prefs, App};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinemate")]
#[command(about = "CineMate - find movies, keep a watchlist and see what you've been up to")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    Search {
        query: String,

        /// Maximum number of results to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Autocomplete suggestions for a partial title
    #[command(long_about = "Autocomplete suggestions for a partial title. Queries shorter than two characters return nothing; at most eight titles are shown.")]
    Suggest { query: String },
    /// Show details, credits and list status for a movie
    Details { id: MovieId },
    /// Show where a movie can be streamed, rented or bought
    Where {
        id: MovieId,

        /// ISO 3166-1 country code (defaults to the configured region)
        #[arg(long)]
        region: Option<String>,
    },
    /// List TMDB movie genres
    Genres,
    /// Best movies of a genre
    Discover {
        /// Genre name or id
        #[arg(long)]
        genre: String,

        /// TMDB sort order
        #[arg(long, default_value = "vote_average.desc")]
        sort: String,

        /// Ignore movies with fewer votes
        #[arg(long, default_value_t = 100)]
        min_votes: u32,

        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Recommendations filtered by your preferences
    ForYou,
    /// Show or change your watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<ListCommands>,
    },
    /// Show or change the movies you've watched
    Watched {
        #[command(subcommand)]
        cmd: Option<ListCommands>,
    },
    /// Browse or clear your activity history
    History {
        /// Only show one kind of activity (e.g. search, watchlist-add, watched)
        #[arg(long)]
        filter: Option<HistoryAction>,

        /// Page number (10 entries per page)
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[command(subcommand)]
        cmd: Option<HistoryCommands>,
    },
    /// Recommendation preferences
    Prefs {
        #[command(subcommand)]
        cmd: Option<PrefsCommands>,
    },
    /// Show or change configuration and credentials
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// List saved movies
    List,
    /// Add the movie if absent, remove it if present
    Toggle { id: MovieId },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Delete all history entries
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Show current preferences
    Show,
    /// Change one or more preferences
    Set {
        /// Genre name, or "All"
        #[arg(long)]
        genre: Option<String>,

        #[arg(long)]
        min_rating: Option<f64>,

        #[arg(long)]
        from_year: Option<i32>,

        #[arg(long)]
        to_year: Option<i32>,
    },
    /// Restore default preferences
    Reset,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks secrets)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store TMDB credentials (prompts when no flag is given)
    Tmdb {
        #[arg(long)]
        api_key: Option<String>,

        /// TMDB v4 read access token
        #[arg(long)]
        bearer_token: Option<String>,
    },
    /// Print the locations of config, credentials, data and logs
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::new().map_err(|e| eyre!("Could not determine configuration directory: {}", e))?;
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    logging::init_logging(cli.verbose, cli.quiet, &config.logging).map_err(|e| eyre!("{}", e))?;

    if let Err(e) = config.validate() {
        return Err(eyre!("Invalid configuration in {}: {}", config_file.display(), e));
    }

    let output = output::Output::new(cli.output, cli.quiet);
    let app = App::new(paths, config, output)?;

    let result = run(&app, cli.command).await;
    if let Err(e) = &result {
        tracing::debug!(error = ?e, "Command failed");
    }
    result
}

async fn run(app: &App, command: Commands) -> color_eyre::Result<()> {
    match command {
        Commands::Search { query, limit } => movies::run_search(app, &query, limit).await,
        Commands::Suggest { query } => movies::run_suggest(app, &query).await,
        Commands::Details { id } => movies::run_details(app, id).await,
        Commands::Where { id, region } => movies::run_where(app, id, region).await,
        Commands::Genres => movies::run_genres(app).await,
        Commands::Discover { genre, sort, min_votes, limit } => movies::run_discover(app, &genre, sort, min_votes, limit).await,
        Commands::ForYou => movies::run_for_you(app).await,
        Commands::Watchlist { cmd } => run_list(app, ListKind::Watchlist, cmd).await,
        Commands::Watched { cmd } => run_list(app, ListKind::Watched, cmd).await,
        Commands::History { filter, page, cmd } => match cmd {
            Some(HistoryCommands::Clear { yes }) => history::run_clear(app, yes),
            None => history::run_show(app, filter, page),
        },
        Commands::Prefs { cmd } => match cmd.unwrap_or(PrefsCommands::Show) {
            PrefsCommands::Show => prefs::run_show(app),
            PrefsCommands::Set { genre, min_rating, from_year, to_year } => {
                prefs::run_set(app, PrefsUpdate { genre, min_rating, from_year, to_year }).await
            }
            PrefsCommands::Reset => prefs::run_reset(app),
        },
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show { full: false }) {
            ConfigCommands::Show { full } => config::run_show(app, full),
            ConfigCommands::Tmdb { api_key, bearer_token } => config::run_tmdb(app, api_key, bearer_token).await,
            ConfigCommands::Path => config::run_path(app),
        },
    }
}

async fn run_list(app: &App, kind: ListKind, cmd: Option<ListCommands>) -> color_eyre::Result<()> {
    match cmd.unwrap_or(ListCommands::List) {
        ListCommands::List => lists::run_list(app, kind).await,
        ListCommands::Toggle { id } => lists::run_toggle(app, kind, id).await,
    }
}
