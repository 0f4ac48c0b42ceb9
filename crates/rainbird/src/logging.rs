use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Target prefix shared by every crate in the workspace.
const OWN_TARGETS: &str = "rainbird";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// `--debug` lifts the level to at least `Debug` so payload logs show.
    pub fn with_debug(self, debug: bool) -> Self {
        if debug {
            self.max(LogLevel::Debug)
        } else {
            self
        }
    }
}

/// Our crates log at `level`; the HTTP stack never goes below warn.
fn filter(level: LogLevel) -> Targets {
    let own = level.as_filter();
    Targets::new()
        .with_target(OWN_TARGETS, own)
        .with_default(own.min(LevelFilter::WARN))
}

pub fn init_logging(format: LogFormat, level: LogLevel) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);
    let registry = tracing_subscriber::registry().with(filter(level));

    let _ = match format {
        LogFormat::Text => registry.with(layer).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn debug_flag_never_lowers_level() {
        assert_eq!(LogLevel::Warn.with_debug(true), LogLevel::Debug);
        assert_eq!(LogLevel::Trace.with_debug(true), LogLevel::Trace);
        assert_eq!(LogLevel::Warn.with_debug(false), LogLevel::Warn);
    }

    #[test]
    fn payload_logs_stay_inside_our_crates() {
        let targets = filter(LogLevel::Debug);
        assert!(targets.would_enable("rainbird_controller::exchange", &Level::DEBUG));
        assert!(!targets.would_enable("hyper_util::client", &Level::DEBUG));
        assert!(targets.would_enable("reqwest::connect", &Level::WARN));

        let targets = filter(LogLevel::Error);
        assert!(!targets.would_enable("reqwest::connect", &Level::WARN));
        assert!(!targets.would_enable("rainbird_sip::codec", &Level::WARN));
    }
}
