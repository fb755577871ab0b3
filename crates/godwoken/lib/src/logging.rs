use std::{fmt, str::FromStr};

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "info";

/// Output format of the tracing subscriber installed by [`setup_tracing`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable, colored output.
    #[default]
    Terminal,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Terminal => f.write_str("terminal"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Installs the global tracing subscriber. The filter is read from `RUST_LOG` and falls back to
/// `info`.
pub fn setup_tracing(format: LogFormat) -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Terminal => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|err| eyre::eyre!(err))
}
