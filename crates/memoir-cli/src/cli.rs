//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use memoir_importer::ExportFormat;
use std::path::PathBuf;

/// Memoir CLI - Rebuild chat exports and extract facts about the user.
#[derive(Debug, Parser)]
#[command(name = "memoir")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MEMOIR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs or fact text only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import an export file and list its conversations
    Import(ImportArgs),

    /// Import an export file and extract facts about the user
    Extract(ExtractArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Path to the export's conversations.json
    pub file: PathBuf,

    /// Which provider produced the export
    #[arg(short, long, value_enum, default_value = "chatgpt")]
    pub source: SourceArg,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Path to the export's conversations.json
    pub file: PathBuf,

    /// Which provider produced the export
    #[arg(short, long, value_enum, default_value = "chatgpt")]
    pub source: SourceArg,

    /// Only extract from the conversation with this id
    #[arg(long)]
    pub conversation: Option<String>,

    /// Write the extracted facts to this file as JSON
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Drop facts with identical category and content
    #[arg(long)]
    pub dedup: bool,

    /// Override the configured LLM provider
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Export source argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceArg {
    /// ChatGPT export (node tree)
    #[value(alias = "openai")]
    Chatgpt,
    /// Claude export (message list)
    #[value(alias = "anthropic")]
    Claude,
}

/// LLM provider argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// OpenAI-compatible chat completions
    Openai,
    /// Local Ollama server
    Ollama,
    /// Offline stand-in
    Mock,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<SourceArg> for ExportFormat {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Chatgpt => ExportFormat::ChatGpt,
            SourceArg::Claude => ExportFormat::Claude,
        }
    }
}

impl From<ProviderArg> for crate::config::Provider {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Openai => crate::config::Provider::Openai,
            ProviderArg::Ollama => crate::config::Provider::Ollama,
            ProviderArg::Mock => crate::config::Provider::Mock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_command() {
        let cli = Cli::parse_from(["memoir", "import", "conversations.json", "--source", "claude"]);
        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.file, PathBuf::from("conversations.json"));
                assert_eq!(args.source, SourceArg::Claude);
            }
            _ => panic!("Expected Import command"),
        }
    }

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "memoir",
            "extract",
            "conversations.json",
            "--out",
            "facts.json",
            "--dedup",
            "--provider",
            "mock",
            "-f",
            "json",
        ]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.source, SourceArg::Chatgpt);
                assert_eq!(args.out, Some(PathBuf::from("facts.json")));
                assert!(args.dedup);
                assert_eq!(args.provider, Some(ProviderArg::Mock));
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_config_init_command() {
        let cli = Cli::parse_from(["memoir", "config", "init", "--force"]);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force },
            }) => assert!(force),
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_source_aliases() {
        let cli = Cli::parse_from(["memoir", "import", "x.json", "-s", "openai"]);
        match cli.command {
            Command::Import(args) => {
                let format: ExportFormat = args.source.into();
                assert_eq!(format, ExportFormat::ChatGpt);
            }
            _ => panic!("Expected Import command"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["memoir"]).is_err());
    }
}
