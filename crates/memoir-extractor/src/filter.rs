//! Message filtering and extraction-unit construction

use crate::config::ExtractorConfig;
use crate::types::{ExtractionUnit, NO_CONTEXT};
use memoir_domain::{Message, Role};

/// Whether a message is worth sending to the model
///
/// True iff the message is user-authored, its trimmed content is at least
/// `min_message_chars` characters, and its trimmed lower-cased content is not
/// a skip phrase.
pub fn is_candidate(message: &Message, config: &ExtractorConfig) -> bool {
    if message.role != Role::User {
        return false;
    }
    let trimmed = message.content.trim();
    if trimmed.chars().count() < config.min_message_chars {
        return false;
    }
    !config.is_skip_phrase(&trimmed.to_lowercase())
}

/// Keep candidate messages, capturing preceding assistant context and position
pub fn select_units(messages: &[Message], config: &ExtractorConfig) -> Vec<ExtractionUnit> {
    messages
        .iter()
        .enumerate()
        .filter(|(_, message)| is_candidate(message, config))
        .map(|(index, message)| {
            let context = index
                .checked_sub(1)
                .map(|prev| &messages[prev])
                .filter(|prev| prev.role == Role::Assistant)
                .map_or_else(|| NO_CONTEXT.to_string(), |prev| prev.content.clone());

            ExtractionUnit {
                message: message.clone(),
                context,
                index,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_filters_short_and_non_user() {
        let config = ExtractorConfig::default();
        assert!(is_candidate(&Message::user("I love coding in Python!"), &config));
        assert!(!is_candidate(&Message::user("Short"), &config));
        assert!(!is_candidate(
            &Message::assistant("This assistant reply is long enough."),
            &config
        ));
    }

    #[test]
    fn test_length_is_measured_trimmed() {
        let config = ExtractorConfig::default();
        // 19 visible characters padded with whitespace
        let padded = format!("   {}   ", "a".repeat(19));
        assert!(!is_candidate(&Message::user(padded), &config));
        assert!(is_candidate(&Message::user("a".repeat(20)), &config));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let config = ExtractorConfig::default();
        assert!(!is_candidate(&Message::user("é".repeat(19)), &config));
    }

    #[test]
    fn test_skip_phrase_match_is_exact() {
        let config = ExtractorConfig {
            min_message_chars: 0,
            ..ExtractorConfig::default()
        };
        assert!(!is_candidate(&Message::user("  Thank You  "), &config));
        assert!(!is_candidate(&Message::user("OK"), &config));
        assert!(is_candidate(&Message::user("ok then"), &config));
    }

    #[test]
    fn test_mixed_case_configured_phrase() {
        let config = ExtractorConfig {
            min_message_chars: 0,
            skip_phrases: vec!["Thanks".to_string()],
            ..ExtractorConfig::default()
        };
        assert!(!is_candidate(&Message::user("THANKS"), &config));
        assert!(!is_candidate(&Message::user("thanks"), &config));
        assert!(is_candidate(&Message::user("thanks a lot"), &config));
    }

    #[test]
    fn test_context_capture() {
        let config = ExtractorConfig::default();
        let messages = vec![
            Message::user("I am moving to Lisbon next spring."),
            Message::assistant("That sounds exciting!"),
            Message::user("I need to find a flat near the coast."),
            Message::user("Also I want to learn Portuguese fast."),
        ];

        let units = select_units(&messages, &config);
        assert_eq!(units.len(), 3);

        assert_eq!(units[0].index, 0);
        assert_eq!(units[0].context, NO_CONTEXT);

        assert_eq!(units[1].index, 2);
        assert_eq!(units[1].context, "That sounds exciting!");

        // Preceded by a user message
        assert_eq!(units[2].index, 3);
        assert_eq!(units[2].context, NO_CONTEXT);
    }

    #[test]
    fn test_indices_refer_to_original_positions() {
        let config = ExtractorConfig::default();
        let messages = vec![
            Message::user("hi"),
            Message::assistant("Hello!"),
            Message::user("thanks"),
            Message::user("My daughter just started kindergarten."),
        ];

        let units = select_units(&messages, &config);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].index, 3);
        assert_eq!(units[0].message.content, messages[3].content);
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::User), Just(Role::Assistant), Just(Role::System)]
    }

    proptest! {
        /// Property: exclusion happens exactly for non-user, short, or stoplisted messages
        #[test]
        fn test_filter_rule(role in role_strategy(), content in "\\PC{0,40}") {
            let config = ExtractorConfig::default();
            let message = Message::new(role, content.clone());
            let trimmed = content.trim();
            let expected = role == Role::User
                && trimmed.chars().count() >= 20
                && !config.skip_phrases.contains(&trimmed.to_lowercase());
            prop_assert_eq!(is_candidate(&message, &config), expected);
        }

        /// Property: unit indices are strictly increasing and point at the right message
        #[test]
        fn test_units_ordered(contents in prop::collection::vec("[a-z ]{0,30}", 0..30)) {
            let config = ExtractorConfig::default();
            let messages: Vec<_> = contents
                .iter()
                .enumerate()
                .map(|(i, c)| if i % 3 == 1 { Message::assistant(c.clone()) } else { Message::user(c.clone()) })
                .collect();

            let units = select_units(&messages, &config);
            prop_assert!(units.windows(2).all(|w| w[0].index < w[1].index));
            for unit in &units {
                prop_assert_eq!(&messages[unit.index], &unit.message);
            }
        }
    }
}
