//! Franco-Arabic Translator
//!
//! An HTTP relay that translates batches of Arabic lines into English and
//! Franco-Arabic transliteration, using a chat model when an API key is
//! configured and the public Google Translate endpoint otherwise.

mod chat;
mod config;
mod error;
mod extract;
mod google;
mod server;
mod translator;

use anyhow::Result;
use config::Config;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use translator::Translator;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging - use RUST_LOG env var, defaulting to info level
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("franco_translator=info")),
        )
        .init();

    // Load configuration once; everything downstream borrows it
    let config = Config::load()?;

    info!(
        "Starting translator (chat model enabled: {}, static files: {:?})",
        config.has_openai(),
        config.public_dir
    );

    let translator = Translator::new(&config);
    server::serve(&config, translator).await
}
