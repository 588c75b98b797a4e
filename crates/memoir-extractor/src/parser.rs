//! Parse LLM output into facts
//!
//! The model answers with free text, one fact per line:
//!
//! ```text
//! [<index>] Fact: <fact text>. Category: <category>
//! ```
//!
//! Parsing is best-effort. A line that does not fit is dropped on its own
//! and never affects the other lines.

use crate::types::ExtractionUnit;
use memoir_domain::{Fact, FactCategory};
use serde_json::Value;

const FACT_MARKER: &str = "Fact:";
const CATEGORY_MARKER: &str = "Category:";

/// Facts recovered from one batch response
#[derive(Debug, Clone, Default)]
pub struct BatchParse {
    /// Facts in response-line order
    pub facts: Vec<Fact>,

    /// Candidate lines (bracket and `Fact:` present) that were rejected
    pub discarded: usize,
}

/// Parse a batch response against the units that were sent in that batch
pub fn parse_batch_response(response: &str, batch: &[ExtractionUnit]) -> BatchParse {
    let mut parsed = BatchParse::default();

    for line in response.lines().filter(|line| is_candidate_line(line)) {
        match parse_line(line, batch) {
            Some(fact) => parsed.facts.push(fact),
            None => parsed.discarded += 1,
        }
    }

    parsed
}

fn is_candidate_line(line: &str) -> bool {
    line.contains('[') && line.contains(FACT_MARKER)
}

fn parse_line(line: &str, batch: &[ExtractionUnit]) -> Option<Fact> {
    let open = line.find('[')?;
    let close = line.find(']')?;
    if close < open {
        return None;
    }
    let index: usize = line[open + 1..close].trim().parse().ok()?;
    let unit = batch.iter().find(|unit| unit.index == index)?;

    let (head, category) = line.split_once(CATEGORY_MARKER)?;
    let (_, content) = head.split_once(FACT_MARKER)?;

    let mut fact = Fact::new(content.trim(), FactCategory::from_label(category.trim()));
    fact.source_message_id = unit.message.id().map(str::to_string);
    fact.timestamp = unit.message.timestamp;
    fact.metadata
        .insert("message_index".to_string(), Value::from(unit.index));
    Some(fact)
}
