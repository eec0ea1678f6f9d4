use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log level {level:?}: {source}")]
    InvalidLevel {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install global subscriber: {0}")]
    Install(String),
}

/// Install the process-wide `tracing` subscriber.
///
/// Call once from `main` before serving; there is no teardown. Components
/// only emit through the `tracing` macros and never touch subscriber state.
/// JSON lines by default, human-readable output when `pretty` is set.
pub fn init(level: &str, pretty: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(level).map_err(|source| LoggingError::InvalidLevel {
        level: level.to_string(),
        source,
    })?;

    let builder = fmt().with_env_filter(filter).with_target(true);

    let result = if pretty {
        builder.pretty().try_init()
    } else {
        builder
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .try_init()
    };

    result.map_err(|e| LoggingError::Install(e.to_string()))
}
