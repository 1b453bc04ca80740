//! cinedeck - TMDB account and catalog browser CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use cinedeck_api::tmdb::TmdbClient;
use cinedeck_core::{
    AccountListCategory, AccountStates, AppState, Credentials, Event, Intent, MediaMutation,
    MediaType, Movie, Session, Store, TvShow,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};

/// Environment variable read when `--password` is omitted.
const PASSWORD_ENV: &str = "TMDB_PASSWORD";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Sign in with a TMDB username and password and save the session.
    Login(LoginArgs),
    /// Signed-in account: detail, lists, counts, ratings and toggles.
    Account(AccountCommand),
    /// Movie catalog.
    Movies(MoviesCommand),
    /// TV catalog.
    Shows(ShowsCommand),
    /// Inspect the config file.
    Config(ConfigCommand),
}

/// Arguments for the `login` subcommand.
#[derive(clap::Args)]
struct LoginArgs {
    /// TMDB username.
    #[arg(long)]
    username: String,

    /// TMDB password (falls back to `TMDB_PASSWORD`).
    #[arg(long)]
    password: Option<String>,
}

/// Arguments for the `account` subcommand.
#[derive(clap::Args)]
struct AccountCommand {
    /// Account subcommand to run.
    #[command(subcommand)]
    command: AccountSubcommands,
}

/// Available account subcommands.
#[derive(Subcommand)]
enum AccountSubcommands {
    /// Show account detail.
    Detail,
    /// Show one page of a watchlist, favorite or rated list.
    List(ListArgs),
    /// Count watchlist, favorite and rated items across movies and TV.
    Counts,
    /// Average of every rating on the rated list.
    AverageRating(MediaArgs),
    /// Add or remove an item from favorites.
    Favorite(ToggleArgs),
    /// Add or remove an item from the watchlist.
    Watchlist(ToggleArgs),
}

/// Arguments for the `account list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Media kind.
    #[arg(long, value_enum)]
    media: MediaArg,

    /// List category.
    #[arg(long, value_enum)]
    category: CategoryArg,

    /// 1-based page.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Media kind selector.
#[derive(clap::Args)]
struct MediaArgs {
    /// Media kind.
    #[arg(long, value_enum)]
    media: MediaArg,
}

/// Arguments for the toggle subcommands.
#[derive(clap::Args)]
struct ToggleArgs {
    /// Media kind.
    #[arg(long, value_enum)]
    media: MediaArg,

    /// TMDB movie or series ID.
    #[arg(long)]
    id: u64,

    /// Remove instead of add.
    #[arg(long)]
    remove: bool,
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesCommand {
    /// Movies subcommand to run.
    #[command(subcommand)]
    command: MoviesSubcommands,
}

/// Available movie subcommands.
#[derive(Subcommand)]
enum MoviesSubcommands {
    /// Movies now playing in theatres.
    NowPlaying(PageArgs),
    /// Favorite/watchlist/rating state of one movie.
    States(IdArgs),
}

/// Arguments for the `shows` subcommand.
#[derive(clap::Args)]
struct ShowsCommand {
    /// Shows subcommand to run.
    #[command(subcommand)]
    command: ShowsSubcommands,
}

/// Available TV subcommands.
#[derive(Subcommand)]
enum ShowsSubcommands {
    /// Popular TV shows.
    Popular(PageArgs),
    /// Favorite/watchlist/rating state of one show.
    States(IdArgs),
}

/// Page selector.
#[derive(clap::Args)]
struct PageArgs {
    /// 1-based page.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Item selector.
#[derive(clap::Args)]
struct IdArgs {
    /// TMDB ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the resolved config.
    Show,
}

/// Media kind as accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum MediaArg {
    /// Movies.
    Movie,
    /// TV shows.
    Tv,
}

impl From<MediaArg> for MediaType {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Movie => Self::Movie,
            MediaArg::Tv => Self::Tv,
        }
    }
}

/// Account list category as accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    /// Watchlist.
    Watchlist,
    /// Favorites.
    Favorite,
    /// Rated items.
    Rated,
}

impl From<CategoryArg> for AccountListCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Watchlist => Self::Watchlist,
            CategoryArg::Favorite => Self::Favorite,
            CategoryArg::Rated => Self::Rated,
        }
    }
}

/// Loaded config plus where it came from.
struct App {
    config_path: PathBuf,
    config: AppConfig,
}

impl App {
    /// Loads the config file for `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved or the file is invalid.
    fn load(dir: Option<&PathBuf>) -> Result<Self> {
        let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
        let config = AppConfig::load(&config_path).context("failed to load config")?;
        Ok(Self {
            config_path,
            config,
        })
    }

    /// Builds a `TmdbClient` from the config and `TMDB_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is configured or the client fails to build.
    #[instrument(skip_all)]
    fn client(&self) -> Result<TmdbClient> {
        let mut builder = TmdbClient::builder()
            .api_token(self.config.api_token()?)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ));
        if let Some(url) = self.config.base_url()? {
            builder = builder.base_url(url);
        }
        if let Some(language) = &self.config.tmdb.language {
            builder = builder.language(language.as_str());
        }
        if let Some(interval) = self.config.min_interval() {
            builder = builder.min_interval(interval);
        }
        builder.build().context("failed to build TMDB client")
    }

    /// A store with no session.
    fn anonymous_store(&self) -> Result<Store<TmdbClient>> {
        Ok(Store::new(self.client()?))
    }

    /// A store seeded with the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if no session has been saved.
    fn signed_in_store(&self) -> Result<Store<TmdbClient>> {
        let session_id = self
            .config
            .session
            .session_id
            .as_deref()
            .context("not signed in: run `cinedeck login` first")?;
        let client = self.client()?;

        let mut state = AppState::default();
        state.apply(&Event::SessionCreated(Session::new(session_id)));
        Ok(Store::with_state(client, state))
    }

    fn wait(&self) -> Duration {
        self.config.wait_timeout()
    }
}

/// Dispatches `intent` and waits for its terminal event, turning failure
/// events into errors.
///
/// # Errors
///
/// Returns an error on timeout or when the terminal event is a failure.
async fn settle(store: &Store<TmdbClient>, intent: Intent, timeout: Duration) -> Result<Event> {
    let event = store.run(intent, timeout).await?;
    if let Some(error) = event.failure() {
        return Err(anyhow::Error::new(error.clone()).context(event.label()));
    }
    Ok(event)
}

/// Loads configuration and account detail concurrently.
///
/// # Errors
///
/// Returns an error if either load fails.
async fn load_account(store: &Store<TmdbClient>, timeout: Duration) -> Result<()> {
    tokio::try_join!(
        settle(store, Intent::FetchConfiguration, timeout),
        settle(store, Intent::FetchAccountDetail, timeout),
    )?;
    Ok(())
}

/// Runs the `login` subcommand.
///
/// # Errors
///
/// Returns an error if no password is available, the login flow fails or the
/// session cannot be saved.
#[instrument(skip_all, fields(username = %args.username))]
async fn run_login(args: &LoginArgs, dir: Option<&PathBuf>) -> Result<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => std::env::var(PASSWORD_ENV)
            .with_context(|| format!("password is required: pass --password or set {PASSWORD_ENV}"))?,
    };
    let mut app = App::load(dir)?;
    let store = app.anonymous_store()?;

    let credentials = Credentials {
        username: args.username.clone(),
        password,
    };
    settle(&store, Intent::Login(credentials), app.wait()).await?;

    let state = store.state().await;
    let session = state.require_session()?;
    app.config.session.session_id = Some(session.session_id.clone());
    app.config
        .save(&app.config_path)
        .context("failed to save session")?;

    tracing::info!("Signed in as {}", args.username);
    tracing::info!("Session saved to {}", app.config_path.display());
    Ok(())
}

/// Runs the `account detail` subcommand.
///
/// # Errors
///
/// Returns an error if not signed in or the request fails.
#[instrument(skip_all)]
async fn run_account_detail(dir: Option<&PathBuf>) -> Result<()> {
    let app = App::load(dir)?;
    let store = app.signed_in_store()?;
    settle(&store, Intent::FetchAccountDetail, app.wait()).await?;

    let state = store.state().await;
    let account = state.require_account()?;
    tracing::info!("ID: {}", account.id);
    tracing::info!("Username: {}", account.username);
    tracing::info!("Name: {}", account.name.as_deref().unwrap_or("-"));
    tracing::info!("Avatar: {}", account.avatar_url.as_deref().unwrap_or("-"));
    Ok(())
}

/// Runs the `account list` subcommand.
///
/// # Errors
///
/// Returns an error if not signed in or a request fails.
#[instrument(skip_all)]
async fn run_account_list(args: &ListArgs, dir: Option<&PathBuf>) -> Result<()> {
    let app = App::load(dir)?;
    let store = app.signed_in_store()?;
    load_account(&store, app.wait()).await?;

    let media_type = MediaType::from(args.media);
    let category = AccountListCategory::from(args.category);
    let intent = Intent::FetchAccountMedia {
        media_type,
        category,
        page: args.page,
    };
    settle(&store, intent, app.wait()).await?;

    let state = store.state().await;
    match media_type {
        MediaType::Movie => print_movies(state.account.movies.get(category)),
        MediaType::Tv => print_shows(state.account.shows.get(category)),
    }
    Ok(())
}

/// Runs the `account counts` subcommand.
///
/// # Errors
///
/// Returns an error if not signed in or any of the six requests fails.
#[instrument(skip_all)]
async fn run_account_counts(dir: Option<&PathBuf>) -> Result<()> {
    let app = App::load(dir)?;
    let store = app.signed_in_store()?;
    settle(&store, Intent::FetchAccountDetail, app.wait()).await?;
    let event = settle(&store, Intent::FetchMediaCount, app.wait()).await?;

    if let Event::MediaCountLoaded(count) = event {
        tracing::info!("Watchlist: {}", count.watchlist);
        tracing::info!("Favorites: {}", count.favorites);
        tracing::info!("Ratings: {}", count.ratings);
    }
    Ok(())
}

/// Runs the `account average-rating` subcommand.
///
/// # Errors
///
/// Returns an error if not signed in, a page fails or nothing is rated.
#[instrument(skip_all)]
async fn run_account_average(args: &MediaArgs, dir: Option<&PathBuf>) -> Result<()> {
    let app = App::load(dir)?;
    let store = app.signed_in_store()?;
    settle(&store, Intent::FetchAccountDetail, app.wait()).await?;

    let media_type = MediaType::from(args.media);
    let event = settle(&store, Intent::FetchAverageRating { media_type }, app.wait()).await?;
    if let Event::AverageRatingLoaded { average, .. } = event {
        tracing::info!("Average {} rating: {:.2}", media_type, average);
    }
    Ok(())
}

/// Runs the `account favorite` and `account watchlist` subcommands.
///
/// # Errors
///
/// Returns an error if not signed in, the mutation fails or the refresh
/// fails.
#[instrument(skip_all, fields(id = args.id, remove = args.remove))]
async fn run_account_toggle(
    args: &ToggleArgs,
    favorite: bool,
    dir: Option<&PathBuf>,
) -> Result<()> {
    let app = App::load(dir)?;
    let store = app.signed_in_store()?;
    settle(&store, Intent::FetchAccountDetail, app.wait()).await?;

    let media_type = MediaType::from(args.media);
    let mutation = if args.remove {
        MediaMutation::remove(media_type, args.id)
    } else {
        MediaMutation::add(media_type, args.id)
    };
    let intent = if favorite {
        Intent::ToggleFavorite(mutation)
    } else {
        Intent::ToggleWatchlist(mutation)
    };

    match settle(&store, intent, app.wait()).await? {
        Event::MovieAccountStatesLoaded { movie_id, states } => print_states(movie_id, &states),
        Event::ShowAccountStatesLoaded { show_id, states } => print_states(show_id, &states),
        _ => {}
    }
    Ok(())
}

/// Runs the `movies now-playing` subcommand.
///
/// # Errors
///
/// Returns an error if a request fails.
#[instrument(skip_all)]
async fn run_now_playing(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let app = App::load(dir)?;
    let store = app.anonymous_store()?;
    settle(&store, Intent::FetchConfiguration, app.wait()).await?;
    settle(&store, Intent::FetchNowPlaying { page: args.page }, app.wait()).await?;

    let state = store.state().await;
    tracing::info!("Page {}/{}", state.movies.page, state.movies.total_pages);
    print_movies(&state.movies.now_playing);
    Ok(())
}

/// Runs the `shows popular` subcommand.
///
/// # Errors
///
/// Returns an error if a request fails.
#[instrument(skip_all)]
async fn run_popular_shows(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let app = App::load(dir)?;
    let store = app.anonymous_store()?;
    settle(&store, Intent::FetchConfiguration, app.wait()).await?;
    settle(&store, Intent::FetchPopularShows { page: args.page }, app.wait()).await?;

    let state = store.state().await;
    tracing::info!("Page {}/{}", state.shows.page, state.shows.total_pages);
    print_shows(&state.shows.popular);
    Ok(())
}

/// Runs the `movies states` and `shows states` subcommands.
///
/// # Errors
///
/// Returns an error if not signed in or the request fails.
#[instrument(skip_all, fields(id = args.id))]
async fn run_states(args: &IdArgs, media_type: MediaType, dir: Option<&PathBuf>) -> Result<()> {
    let app = App::load(dir)?;
    let store = app.signed_in_store()?;
    let intent = match media_type {
        MediaType::Movie => Intent::FetchMovieAccountStates { movie_id: args.id },
        MediaType::Tv => Intent::FetchShowAccountStates { show_id: args.id },
    };

    match settle(&store, intent, app.wait()).await? {
        Event::MovieAccountStatesLoaded { movie_id, states } => print_states(movie_id, &states),
        Event::ShowAccountStatesLoaded { show_id, states } => print_states(show_id, &states),
        _ => {}
    }
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let app = App::load(dir)?;
    let tmdb = &app.config.tmdb;

    tracing::info!("Config file: {}", app.config_path.display());
    tracing::info!(
        "API token: {}",
        if app.config.api_token().is_ok() {
            "set"
        } else {
            "not set"
        }
    );
    tracing::info!("Language: {}", tmdb.language.as_deref().unwrap_or("en-US"));
    tracing::info!("Base URL: {}", tmdb.base_url.as_deref().unwrap_or("(default)"));
    tracing::info!(
        "Session: {}",
        if app.config.session.session_id.is_some() {
            "saved"
        } else {
            "none"
        }
    );
    tracing::info!("Wait timeout: {}s", app.wait().as_secs());
    Ok(())
}

fn print_movies(movies: &[Movie]) {
    tracing::info!("ID\tTitle\t\t\tReleaseDate\tVote\tRating\tGenres");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{:.1}\t{}\t{}",
            movie.id,
            movie.title,
            movie.release_date.as_deref().unwrap_or("-"),
            movie.vote_average,
            format_rating(movie.rating),
            format_genres(&movie.genre_names),
        );
    }
}

fn print_shows(shows: &[TvShow]) {
    tracing::info!("ID\tName\t\t\tFirstAirDate\tVote\tRating\tGenres");
    for show in shows {
        tracing::info!(
            "{}\t{}\t{}\t{:.1}\t{}\t{}",
            show.id,
            show.name,
            show.first_air_date.as_deref().unwrap_or("-"),
            show.vote_average,
            format_rating(show.rating),
            format_genres(&show.genre_names),
        );
    }
}

fn print_states(id: u64, states: &AccountStates) {
    tracing::info!("ID: {}", id);
    tracing::info!("Favorite: {}", states.favorite);
    tracing::info!("Watchlist: {}", states.watchlist);
    tracing::info!("Rating: {}", format_rating(states.rating));
}

fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| String::from("-"), |r| format!("{r:.1}"))
}

fn format_genres(names: &[String]) -> String {
    if names.is_empty() {
        String::from("-")
    } else {
        names.join(", ")
    }
}

/// Installs the tracing subscriber.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        // Exporting is opt-in: only when an OTLP endpoint is configured.
        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Login(args) => run_login(&args, dir).await,
        Commands::Account(account) => match account.command {
            AccountSubcommands::Detail => run_account_detail(dir).await,
            AccountSubcommands::List(args) => run_account_list(&args, dir).await,
            AccountSubcommands::Counts => run_account_counts(dir).await,
            AccountSubcommands::AverageRating(args) => run_account_average(&args, dir).await,
            AccountSubcommands::Favorite(args) => run_account_toggle(&args, true, dir).await,
            AccountSubcommands::Watchlist(args) => run_account_toggle(&args, false, dir).await,
        },
        Commands::Movies(movies) => match movies.command {
            MoviesSubcommands::NowPlaying(args) => run_now_playing(&args, dir).await,
            MoviesSubcommands::States(args) => run_states(&args, MediaType::Movie, dir).await,
        },
        Commands::Shows(shows) => match shows.command {
            ShowsSubcommands::Popular(args) => run_popular_shows(&args, dir).await,
            ShowsSubcommands::States(args) => run_states(&args, MediaType::Tv, dir).await,
        },
        Commands::Config(config) => match config.command {
            ConfigSubcommands::Show => run_config_show(dir),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rating() {
        // Arrange & Act & Assert
        assert_eq!(format_rating(Some(8.0)), "8.0");
        assert_eq!(format_rating(None), "-");
    }

    #[test]
    fn test_format_genres() {
        // Arrange
        let names = vec![String::from("Drama"), String::from("Crime")];

        // Act & Assert
        assert_eq!(format_genres(&names), "Drama, Crime");
        assert_eq!(format_genres(&[]), "-");
    }

    #[test]
    fn test_cli_arg_mapping() {
        // Arrange & Act & Assert
        assert_eq!(MediaType::from(MediaArg::Tv), MediaType::Tv);
        assert_eq!(
            AccountListCategory::from(CategoryArg::Rated),
            AccountListCategory::Rated
        );
    }
}
