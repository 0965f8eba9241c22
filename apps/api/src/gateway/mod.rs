//! Submission & query gateway: moves form drafts into storage and answers
//! questions about stored submissions through the LLM.
//!
//! Every failure is returned as a `GatewayError`; nothing here panics or
//! retries. A missing storage connection or credential short-circuits before
//! any I/O.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use thiserror::Error;
use tracing::{debug, info};

pub mod context;
pub mod handlers;
pub mod prompts;
pub mod store;

use crate::gateway::context::{build_context, build_prompt};
use crate::gateway::store::RecordStore;
use crate::llm_client::Completer;
use crate::models::submission::{StoredRecord, SubmissionRecord};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Not connected to storage")]
    NotConnected,

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("LLM error: {0}")]
    Completion(String),
}

pub struct Gateway {
    store: Option<Arc<dyn RecordStore>>,
    llm: Arc<dyn Completer>,
    clock: SubmissionClock,
}

impl Gateway {
    /// `store` is `None` when the storage connection could not be established
    /// at start-up; it is never retried.
    pub fn new(store: Option<Arc<dyn RecordStore>>, llm: Arc<dyn Completer>) -> Self {
        Self {
            store,
            llm,
            clock: SubmissionClock::default(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    pub fn is_llm_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Stamps the draft with a creation timestamp and writes it as one new
    /// document. Identical drafts submitted twice become two documents.
    pub async fn submit(&self, record: &SubmissionRecord) -> Result<StoredRecord, GatewayError> {
        let store = self.store.as_ref().ok_or(GatewayError::NotConnected)?;

        let stored = StoredRecord {
            record: record.clone(),
            timestamp: self.clock.next(),
        };

        store
            .insert(&stored)
            .await
            .map_err(|e| GatewayError::Storage(format!("{e:#}")))?;

        info!("Stored submission at {}", stored.timestamp);
        Ok(stored)
    }

    /// Builds a prompt from the newest `limit` records and returns the LLM's
    /// answer verbatim.
    pub async fn answer_question(
        &self,
        question: &str,
        limit: usize,
    ) -> Result<String, GatewayError> {
        let store = self.store.as_ref().ok_or(GatewayError::NotConnected)?;
        if !self.llm.is_configured() {
            return Err(GatewayError::NotConfigured(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        let records = if limit == 0 {
            Vec::new()
        } else {
            store
                .latest(limit)
                .await
                .map_err(|e| GatewayError::Storage(format!("{e:#}")))?
        };

        let prompt = build_prompt(&build_context(&records), question);
        debug!(
            "Asking LLM with {} record(s), prompt length {}",
            records.len(),
            prompt.len()
        );

        self.llm
            .complete(&prompt)
            .await
            .map_err(|e| GatewayError::Completion(e.to_string()))
    }
}

/// Hands out submission timestamps at storage (millisecond) precision,
/// strictly increasing within the process.
#[derive(Default)]
struct SubmissionClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl SubmissionClock {
    fn next(&self) -> DateTime<Utc> {
        self.next_after(Utc::now())
    }

    fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let now = now.trunc_subsecs(3);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}
