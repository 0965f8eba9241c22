// Question-answering prompt fragments.

/// Opening line of the context block.
pub const CONTEXT_HEADER: &str = "Here are recent seller submissions:";

/// Blank line between rendered records.
pub const RECORD_SEPARATOR: &str = "\n\n";
