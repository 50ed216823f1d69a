use tracing::Level;

/// Installs the process-wide subscriber. Call once, before anything logs.
pub fn init(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .with_max_level(level)
        .init();
}
