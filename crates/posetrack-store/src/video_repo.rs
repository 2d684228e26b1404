//! Repository for video metadata documents.
//!
//! The `videos` collection is written by the upstream upload gateway; this
//! service only reads it to resolve a video id to its stored filename.

use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// A video metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Filename relative to the storage root; optional because the
    /// uploader may not have attached a file yet.
    #[serde(default)]
    pub filename: Option<String>,
}

/// Read access to the `videos` collection.
pub struct VideoRepository {
    collection: Collection<VideoRecord>,
}

impl VideoRepository {
    pub fn new(collection: Collection<VideoRecord>) -> Self {
        Self { collection }
    }

    /// Fetch the metadata record for a video id.
    pub async fn get(&self, id: &ObjectId) -> StoreResult<Option<VideoRecord>> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }
}
