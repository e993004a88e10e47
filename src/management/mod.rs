mod auth;
mod browser;
mod token_store;

pub use auth::AuthContext;
pub use auth::AuthState;
pub use auth::MIN_REFRESH_DELAY_SECS;
pub use auth::REFRESH_MARGIN_SECS;
pub use auth::refresh_delay_secs;
pub use browser::Browser;
pub use token_store::FileTokenStore;
pub use token_store::MemoryTokenStore;
pub use token_store::TokenStore;
