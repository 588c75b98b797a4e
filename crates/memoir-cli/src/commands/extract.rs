//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::commands::import::load_conversations;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use memoir_domain::{dedup_facts, Fact};
use memoir_extractor::{ExtractionMetadata, FactExtractor};
use serde_json::Value;
use std::fs;
use tracing::info;

/// Facts from every processed conversation, with combined counters
#[derive(Debug)]
pub struct ExtractOutcome {
    /// Extracted facts, tagged with their conversation id
    pub facts: Vec<Fact>,

    /// Counters summed over all conversations
    pub stats: ExtractionMetadata,

    /// Conversations processed
    pub conversations: usize,
}

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let out = args.out.clone();
    let outcome = run_extract(args, config).await?;

    if let Some(path) = out {
        fs::write(&path, serde_json::to_string_pretty(&outcome.facts)?)?;
        eprintln!(
            "{}",
            formatter.success(&format!(
                "Wrote {} fact(s) to {}",
                outcome.facts.len(),
                path.display()
            ))
        );
    }

    println!("{}", formatter.format_facts(&outcome.facts)?);
    if formatter.format() != OutputFormat::Quiet {
        eprintln!(
            "{}",
            formatter.extraction_summary(outcome.conversations, &outcome.stats)
        );
    }

    Ok(())
}

/// Import the export file and extract facts conversation by conversation.
pub async fn run_extract(args: ExtractArgs, config: &Config) -> Result<ExtractOutcome> {
    let mut conversations = load_conversations(&args.file, args.source.into())?;

    if let Some(wanted) = &args.conversation {
        conversations.retain(|c| &c.id == wanted);
        if conversations.is_empty() {
            return Err(CliError::InvalidInput(format!(
                "No conversation with id '{}' in {}",
                wanted,
                args.file.display()
            )));
        }
    }

    let client = config.build_client(args.provider.map(Into::into));
    let mut stats = ExtractionMetadata {
        model_name: client.model_name().to_string(),
        ..ExtractionMetadata::default()
    };
    let extractor = FactExtractor::with_config(client, config.extractor.clone())?;

    let mut facts = Vec::new();

    for conversation in &conversations {
        let report = extractor.extract_report(&conversation.messages).await;
        info!(
            "Conversation {}: {} fact(s)",
            conversation.id,
            report.facts.len()
        );

        stats.messages_seen += report.metadata.messages_seen;
        stats.units_extracted += report.metadata.units_extracted;
        stats.batches_dispatched += report.metadata.batches_dispatched;
        stats.batches_failed += report.metadata.batches_failed;
        stats.lines_discarded += report.metadata.lines_discarded;
        stats.processing_time_ms += report.metadata.processing_time_ms;

        facts.extend(report.facts.into_iter().map(|mut fact| {
            fact.metadata.insert(
                "conversation_id".to_string(),
                Value::from(conversation.id.clone()),
            );
            fact.with_fingerprint_id()
        }));
    }

    if args.dedup {
        let before = facts.len();
        facts = dedup_facts(facts);
        info!("Dropped {} duplicate fact(s)", before - facts.len());
    }

    Ok(ExtractOutcome {
        facts,
        stats,
        conversations: conversations.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArg;
    use crate::config::Provider;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const EXPORT: &str = r#"[
        {"uuid": "c1", "name": "Work", "chat_messages": [
            {"uuid": "m1", "sender": "human", "text": "I work as a data engineer in Berlin."},
            {"uuid": "m2", "sender": "assistant", "text": "Nice, how do you like it?"},
            {"uuid": "m3", "sender": "human", "text": "ok"}
        ]},
        {"uuid": "c2", "name": "Again", "chat_messages": [
            {"uuid": "m4", "sender": "human", "text": "As I said, I am a data engineer."}
        ]}
    ]"#;

    fn write_export(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("conversations.json");
        fs::write(&path, EXPORT).unwrap();
        path
    }

    fn mock_config() -> Config {
        let mut config = Config::default();
        config.llm.provider = Provider::Mock;
        config.llm.mock_response = "[0] Fact: User is a data engineer. Category: user_info".to_string();
        config
    }

    fn args(file: PathBuf) -> ExtractArgs {
        ExtractArgs {
            file,
            source: SourceArg::Claude,
            conversation: None,
            out: None,
            dedup: false,
            provider: None,
        }
    }

    #[tokio::test]
    async fn test_extract_with_mock_provider() {
        let dir = TempDir::new().unwrap();
        let outcome = run_extract(args(write_export(&dir)), &mock_config())
            .await
            .unwrap();

        assert_eq!(outcome.conversations, 2);
        assert_eq!(outcome.facts.len(), 2);
        assert_eq!(outcome.stats.messages_seen, 4);
        assert_eq!(outcome.stats.units_extracted, 2);
        assert_eq!(outcome.stats.model_name, "mock");

        let first = &outcome.facts[0];
        assert_eq!(first.source_message_id.as_deref(), Some("m1"));
        assert_eq!(first.metadata["conversation_id"], "c1");
        assert!(first.id.is_some());
    }

    #[tokio::test]
    async fn test_dedup_across_conversations() {
        let dir = TempDir::new().unwrap();
        let mut extract_args = args(write_export(&dir));
        extract_args.dedup = true;

        let outcome = run_extract(extract_args, &mock_config()).await.unwrap();
        assert_eq!(outcome.facts.len(), 1);
    }

    #[tokio::test]
    async fn test_conversation_filter() {
        let dir = TempDir::new().unwrap();
        let mut extract_args = args(write_export(&dir));
        extract_args.conversation = Some("c2".to_string());

        let outcome = run_extract(extract_args, &mock_config()).await.unwrap();
        assert_eq!(outcome.conversations, 1);
        assert_eq!(outcome.facts[0].source_message_id.as_deref(), Some("m4"));

        let mut extract_args = args(write_export(&dir));
        extract_args.conversation = Some("missing".to_string());
        let result = run_extract(extract_args, &mock_config()).await;
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_provider_override() {
        let dir = TempDir::new().unwrap();
        let mut extract_args = args(write_export(&dir));
        extract_args.provider = Some(crate::cli::ProviderArg::Mock);

        // Mock provider with no configured reply yields no facts
        let outcome = run_extract(extract_args, &Config::default()).await.unwrap();
        assert!(outcome.facts.is_empty());
        assert_eq!(outcome.stats.batches_dispatched, 2);
    }
}
