//! spotiplay library
//!
//! Search Spotify tracks and start playback from the terminal. The library
//! owns the OAuth token lifecycle (obtain, store, refresh, expire), the
//! authenticated Web API client and the local login server.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local login server
//! - `cli` - Command implementations and terminal views
//! - `config` - Environment-driven configuration
//! - `error` - Error taxonomy
//! - `logging` - `tracing` subscriber setup
//! - `management` - Token store, auth context and result navigation
//! - `server` - Router and listener for the login server
//! - `spotify` - Accounts service and Web API clients
//! - `types` - Domain and wire data structures
//! - `utils` - Small helpers
//!
//! # Example
//!
//! ```
//! use spotiplay::config;
//!
//! #[tokio::main]
//! async fn main() -> spotiplay::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     // Build the auth context and client from `config`...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used at the command layer, where errors of every module
/// meet.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Searching for {}...", query);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the
/// program with status 1.
///
/// Only the command layer uses it; library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems such as a playback request without an
/// active device.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
