//! LLM prompt construction for batch fact extraction

use crate::config::ExtractorConfig;
use crate::types::ExtractionUnit;
use memoir_domain::FactCategory;

/// Builds the single prompt sent for one batch
pub struct BatchPromptBuilder<'a> {
    units: &'a [ExtractionUnit],
    context_chars: usize,
    message_chars: usize,
}

impl<'a> BatchPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(units: &'a [ExtractionUnit], config: &ExtractorConfig) -> Self {
        Self {
            units,
            context_chars: config.context_preview_chars,
            message_chars: config.message_preview_chars,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nCategories: ");
        prompt.push_str(&FactCategory::LABELS.join(", "));
        prompt.push_str(".\nIf a message has no facts, write nothing for it.\n\n");

        prompt.push_str("Messages:\n");
        for unit in self.units {
            prompt.push_str(&format!(
                "[{}] Context: {} | User: {}\n",
                unit.index,
                preview(&unit.context, self.context_chars),
                preview(&unit.message.content, self.message_chars),
            ));
        }

        prompt.push_str("\nExtract facts:");
        prompt
    }
}

/// First `limit` characters on a single line, with `...` when cut
fn preview(text: &str, limit: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Analyze the following user messages and extract any permanent facts about the user.
Each message is shown with the assistant turn that preceded it, for context only.
Report facts stated by the user, one per line, in exactly this format:
[MESSAGE_INDEX] Fact: <fact>. Category: <category>

Use the bracketed index of the message the fact came from."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_CONTEXT;
    use memoir_domain::Message;

    fn unit(index: usize, content: &str, context: &str) -> ExtractionUnit {
        ExtractionUnit {
            message: Message::user(content),
            context: context.to_string(),
            index,
        }
    }

    #[test]
    fn test_prompt_lists_units_with_indices() {
        let units = vec![
            unit(3, "I love coding in Python!", NO_CONTEXT),
            unit(7, "My cat is called Miso.", "Do you have pets?"),
        ];
        let prompt = BatchPromptBuilder::new(&units, &ExtractorConfig::default()).build();

        assert!(prompt.contains("[3] Context: None | User: I love coding in Python!\n"));
        assert!(prompt.contains("[7] Context: Do you have pets? | User: My cat is called Miso.\n"));
        assert!(prompt.ends_with("Extract facts:"));
    }

    #[test]
    fn test_prompt_includes_format_and_categories() {
        let units = vec![unit(0, "I love coding in Python!", NO_CONTEXT)];
        let prompt = BatchPromptBuilder::new(&units, &ExtractorConfig::default()).build();

        assert!(prompt.contains("[MESSAGE_INDEX] Fact: <fact>. Category: <category>"));
        assert!(prompt.contains("preference, project, user_info, goal, other"));
    }

    #[test]
    fn test_previews_truncate_by_characters() {
        let config = ExtractorConfig {
            context_preview_chars: 5,
            message_preview_chars: 8,
            ..ExtractorConfig::default()
        };
        let units = vec![unit(1, "ééééééééééé long message", "assistant context")];
        let prompt = BatchPromptBuilder::new(&units, &config).build();

        assert!(prompt.contains("[1] Context: assis... | User: éééééééé...\n"));
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("line one\nline two", 100), "line one line two");
        assert_eq!(preview("short", 5), "short");
        assert_eq!(preview("", 5), "");
    }
}
