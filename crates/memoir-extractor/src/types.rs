//! Work units and results for extraction

use memoir_domain::{Fact, Message};

/// Context placeholder used when the preceding message is not from the assistant
pub const NO_CONTEXT: &str = "None";

/// One filtered message handed to a batch
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionUnit {
    /// The user message
    pub message: Message,

    /// Content of the immediately preceding assistant message, or [`NO_CONTEXT`]
    pub context: String,

    /// Position of the message in the original sequence
    ///
    /// Unique within one extraction call; the model echoes it to attribute facts.
    pub index: usize,
}

/// Result of an extraction call, with bookkeeping
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// Facts in batch-completion order
    pub facts: Vec<Fact>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionMetadata {
    /// Name of the LLM model used
    pub model_name: String,

    /// Messages passed in
    pub messages_seen: usize,

    /// Messages that survived filtering
    pub units_extracted: usize,

    /// LLM calls issued
    pub batches_dispatched: usize,

    /// Batches whose LLM call failed
    pub batches_failed: usize,

    /// Candidate response lines that could not be turned into facts
    pub lines_discarded: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
