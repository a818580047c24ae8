use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod expand;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "rtmock", version, about = "Generate slot-backed mocks of Rust traits.")]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    #[command(flatten)]
    logging: LoggingOptions,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Expands every annotated trait of a source file into its mock
    Expand(expand::ExpandArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        self.logging.init()?;
        match self.commands {
            Commands::Expand(args) => args.execute(),
        }
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Logging options")]
pub struct LoggingOptions {
    /// Log format to use
    #[arg(global = true)]
    #[arg(long = "log-format", value_name = "FORMAT", default_value_t = LogFormat::Full)]
    #[arg(value_enum)]
    format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Full,
    Json,
}

impl LoggingOptions {
    /// Installs the global subscriber. Logs go to stderr so they never mix with the output.
    fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let builder =
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

        let result = match self.format {
            LogFormat::Full => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        result.map_err(|err| anyhow!(err))
    }
}
