pub mod app;
pub mod config;
pub mod database;
pub mod email_client;
mod error;
pub mod model;
pub mod templ_manager;
pub mod web;

// re-export
pub use app::{App, AppState};
pub use email_client::EmailClient;
pub use error::{Error, Result};
pub use web::serve;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Human readable logs for local development. `RUST_LOG` overrides the default filter.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coffee_rhythms=debug,tower_http=info,info")),
        )
        .compact()
        .init();
}

/// JSON lines for production log collectors.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
