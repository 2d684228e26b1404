//! Repository for analysis documents.

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;
use tracing::info;

use posetrack_models::VideoAnalysis;

use crate::error::{StoreError, StoreResult};

/// CRUD access to the `analysis` collection.
pub struct AnalysisRepository {
    collection: Collection<VideoAnalysis>,
}

impl AnalysisRepository {
    pub fn new(collection: Collection<VideoAnalysis>) -> Self {
        Self { collection }
    }

    /// Insert a completed analysis and return the store-generated id.
    pub async fn insert(&self, analysis: &VideoAnalysis) -> StoreResult<ObjectId> {
        let result = self.collection.insert_one(analysis).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            StoreError::InvalidResponse(format!(
                "insert returned non-ObjectId id: {}",
                result.inserted_id
            ))
        })?;
        info!(analysis_id = %id, video_id = %analysis.video_id, "stored analysis document");
        Ok(id)
    }

    /// Fetch an analysis by id.
    pub async fn get(&self, id: &ObjectId) -> StoreResult<Option<VideoAnalysis>> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    /// All analyses for a video, in insertion order.
    pub async fn list_for_video(&self, video_id: &str) -> StoreResult<Vec<VideoAnalysis>> {
        let cursor = self
            .collection
            .find(doc! { "video_id": video_id })
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Delete an analysis by id. Returns whether a document existed;
    /// deleting an already-deleted id is not an error.
    pub async fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}
