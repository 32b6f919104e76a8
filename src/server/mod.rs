//! HTTP exposure of the storefront core

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_router;

/// Initialize the tracing subscriber, honoring `RUST_LOG` and defaulting
/// to `info`. Safe to call more than once (later calls are no-ops).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
