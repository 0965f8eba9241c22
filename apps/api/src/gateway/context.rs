//! Flattens stored records into the prompt sent to the LLM.

use crate::gateway::prompts::{CONTEXT_HEADER, RECORD_SEPARATOR};
use crate::models::submission::StoredRecord;

/// `Record <n>: key: value, key: value, ...` with `n` starting at 1.
pub fn render_record(position: usize, record: &StoredRecord) -> String {
    let fields = record
        .display_entries()
        .into_iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Record {position}: {fields}")
}

/// The header followed by every record, newest first as given.
pub fn build_context(records: &[StoredRecord]) -> String {
    let body = records
        .iter()
        .enumerate()
        .map(|(i, record)| render_record(i + 1, record))
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR);
    format!("{CONTEXT_HEADER}\n\n{body}")
}

pub fn build_prompt(context: &str, question: &str) -> String {
    format!("{context}\n\nUser question: {question}\n\nAnswer:")
}
