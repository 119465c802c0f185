use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install a [tracing] subscriber which writes to stderr.
///
/// Events at [LevelFilter::WARN] and above are shown, or [LevelFilter::INFO]
/// and above if `verbose`. `RUST_LOG` takes precedence over both.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {e}");
    }
}
