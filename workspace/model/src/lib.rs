pub mod entities;

// Re-export tracing for use in this crate
pub use tracing;

/// Initialize tracing for binaries that embed the model crate directly.
/// The log level is controlled via the RUST_LOG environment variable.
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
