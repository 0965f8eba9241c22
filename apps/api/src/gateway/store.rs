use anyhow::Result;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{options::FindOptions, Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::submission::{StoredRecord, SubmissionRecord};

/// Persistence seam for submissions: append one, read the newest N.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, record: &StoredRecord) -> Result<()>;

    /// Up to `limit` records, newest `timestamp` first. Records sharing a
    /// timestamp come back in reverse insertion order. A `limit` of 0 yields
    /// no records.
    async fn latest(&self, limit: usize) -> Result<Vec<StoredRecord>>;
}

/// Document shape in the `business_data` collection.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub record: SubmissionRecord,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

impl From<&StoredRecord> for RecordDocument {
    fn from(stored: &StoredRecord) -> Self {
        Self {
            id: None,
            record: stored.record.clone(),
            timestamp: stored.timestamp,
        }
    }
}

impl From<RecordDocument> for StoredRecord {
    fn from(document: RecordDocument) -> Self {
        Self {
            record: document.record,
            timestamp: document.timestamp,
        }
    }
}

/// MongoDB-backed record store.
pub struct MongoRecordStore {
    collection: Collection<RecordDocument>,
}

impl MongoRecordStore {
    pub fn new(client: &Client, database: &str, collection: &str) -> Self {
        Self {
            collection: client.database(database).collection(collection),
        }
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn insert(&self, record: &StoredRecord) -> Result<()> {
        let result = self
            .collection
            .insert_one(RecordDocument::from(record), None)
            .await?;
        info!("Inserted submission document {}", result.inserted_id);
        Ok(())
    }

    async fn latest(&self, limit: usize) -> Result<Vec<StoredRecord>> {
        // MongoDB reads `limit(0)` as "no limit".
        if limit == 0 {
            return Ok(Vec::new());
        }

        let options = FindOptions::builder()
            .sort(doc! { "timestamp": -1, "_id": -1 })
            .limit(i64::try_from(limit)?)
            .build();

        let documents: Vec<RecordDocument> =
            self.collection.find(None, options).await?.try_collect().await?;

        Ok(documents.into_iter().map(StoredRecord::from).collect())
    }
}
