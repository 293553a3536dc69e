use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use konspekt_core::{
    DetailLevel, FileBackend, MemoryBackend, Provider, StorageArea, StorageContext, TracingSink,
    storage::{DiagnosticSink, StorageBackend},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod ui;

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliProvider {
    Grok,
    Openai,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliDetail {
    Brief,
    Standard,
    Detailed,
}

impl From<CliDetail> for DetailLevel {
    fn from(cli: CliDetail) -> Self {
        match cli {
            CliDetail::Brief => DetailLevel::Brief,
            CliDetail::Standard => DetailLevel::Standard,
            CliDetail::Detailed => DetailLevel::Detailed,
        }
    }
}

#[derive(Parser)]
#[command(name = "konspekt", version)]
#[command(about = "Summarize YouTube videos into key points and Q&A with an AI provider")]
struct Cli {
    /// Directory for saved settings and history (default: $KONSPEKT_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep settings and history in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a video: summary, key points and Q&A
    Summarize(SummarizeArgs),

    /// Show what konspekt reads from a video URL
    Inspect {
        /// Video URL
        url: String,
    },

    /// Show or change saved settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Browse previously generated summaries
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(clap::Args)]
struct SummarizeArgs {
    /// Video URL
    url: String,

    /// Summary language (e.g., "en", "ru", "uk"). Defaults to the saved setting.
    #[arg(short, long)]
    lang: Option<String>,

    /// AI provider for this run. Defaults to the saved setting.
    #[arg(short, long)]
    provider: Option<CliProvider>,

    /// How many key points and questions to ask for
    #[arg(short, long)]
    detail: Option<CliDetail>,

    /// Ask the provider again even if a saved summary exists
    #[arg(short, long)]
    force: bool,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print current settings
    Show,
    /// Change one setting: provider, language, detail, history-limit
    Set { key: String, value: String },
    /// Restore defaults
    Reset,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved summaries, newest first
    List {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print a saved summary
    Show { video_id: String },
    /// Forget all saved summaries
    Clear,
}

/// Storage and diagnostics shared by every command of one run.
pub struct Session {
    pub context: StorageContext,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl Session {
    fn open(cli: &Cli) -> Self {
        let backend: Arc<dyn StorageBackend> = if cli.ephemeral {
            Arc::new(MemoryBackend::new())
        } else {
            let file = match &cli.data_dir {
                Some(dir) => FileBackend::new(dir),
                None => FileBackend::default_location(),
            };
            tracing::debug!(path = %file.path().display(), "opening storage");
            Arc::new(file)
        };

        Self {
            context: StorageArea::new(backend).open_context(),
            sink: Arc::new(TracingSink),
        }
    }
}

/// Initialize logging
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let session = Session::open(&cli);

    match cli.command {
        Command::Summarize(args) => commands::summarize::run(&session, args).await,
        Command::Inspect { url } => commands::inspect::run(&url),
        Command::Settings { action } => {
            commands::settings::run(&session, action.unwrap_or(SettingsAction::Show))
        }
        Command::History { action } => commands::history::run(
            &session,
            action.unwrap_or(HistoryAction::List { limit: None }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_summarize_overrides() {
        let cli = Cli::try_parse_from([
            "konspekt",
            "--ephemeral",
            "summarize",
            "https://youtu.be/dQw4w9WgXcQ",
            "-p",
            "openai",
            "--detail",
            "brief",
            "-f",
        ])
        .unwrap();

        assert!(cli.ephemeral);
        let Command::Summarize(args) = cli.command else {
            panic!("expected summarize");
        };
        assert_eq!(Provider::from(args.provider.unwrap()), Provider::Openai);
        assert_eq!(DetailLevel::from(args.detail.unwrap()), DetailLevel::Brief);
        assert!(args.force);
        assert!(args.lang.is_none());
    }

    #[test]
    fn settings_and_history_default_to_read_only_views() {
        let cli = Cli::try_parse_from(["konspekt", "settings"]).unwrap();
        assert!(matches!(cli.command, Command::Settings { action: None }));

        let cli = Cli::try_parse_from(["konspekt", "-v", "history", "list", "-l", "3"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(
            cli.command,
            Command::History {
                action: Some(HistoryAction::List { limit: Some(3) })
            }
        ));
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(
            Cli::try_parse_from(["konspekt", "summarize", "u", "--provider", "claude"]).is_err()
        );
    }
}
