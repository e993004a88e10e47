use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotiplay::{
    cli::{self, Session},
    config, error, logging,
    spotify::DEFAULT_SEARCH_LIMIT,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Log diagnostics at debug level (RUST_LOG overrides)
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with Spotify in the browser
    Auth,

    /// Forget the stored token
    Logout,

    /// Show whether you are logged in
    Status,

    /// Search tracks
    Search(SearchOptions),

    /// Show details of a track
    Track(TrackOptions),

    /// Play a track on your active Spotify device
    Play(PlayOptions),

    /// Show your Spotify profile
    Me,

    /// Search and play interactively
    Browse(BrowseOptions),

    /// Run the login server in the foreground
    Serve,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search query
    #[clap(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Number of results (1-50)
    #[clap(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// Track id, spotify:track: URI or open.spotify.com link
    track: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    /// Track id, spotify:track: URI or open.spotify.com link
    track: String,
}

#[derive(Parser, Debug, Clone)]
pub struct BrowseOptions {
    /// Run this search right away
    query: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Command::Serve, false) => "info",
        _ => "warn",
    };
    logging::init_logging(default_level);

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let session = match Session::open(config).await {
        Ok(session) => session,
        Err(e) => error!("Cannot open token store: {}", e),
    };

    match cli.command {
        Command::Auth => cli::auth(&session).await,
        Command::Logout => cli::logout(&session).await,
        Command::Status => cli::status(&session).await,
        Command::Search(opt) => cli::search(&session, &opt.query.join(" "), opt.limit).await,
        Command::Track(opt) => cli::track(&session, &opt.track).await,
        Command::Play(opt) => cli::play(&session, &opt.track).await,
        Command::Me => cli::me(&session).await,
        Command::Browse(opt) => {
            let query = (!opt.query.is_empty()).then(|| opt.query.join(" "));
            cli::browse(&session, query).await
        }
        Command::Serve => cli::serve(&session).await,
        Command::Completions(_) => {}
    }
}
