//! Form state: per-session drafts built up section by section.

pub mod fields;
pub mod handlers;
pub mod sections;
pub mod sessions;
pub mod state;
