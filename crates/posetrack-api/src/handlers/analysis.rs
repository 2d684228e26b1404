//! Analysis API handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use posetrack_models::{FrameRecord, VideoAnalysis};
use posetrack_store::parse_object_id;

use crate::error::{ApiError, ApiResult};
use crate::services::VideoProcessor;
use crate::state::AppState;

/// Response for a completed analysis run.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub message: String,
    pub analysis_id: String,
    pub frames_processed: u64,
    pub frames_with_no_detection: u64,
    pub total_frames: u64,
    pub duration: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// A stored analysis document with its id re-encoded as a plain string.
#[derive(Serialize)]
pub struct AnalysisDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub video_id: String,
    pub data: Vec<FrameRecord>,
    pub created_at: DateTime<Utc>,
    pub total_frames: u64,
    pub max_x: f64,
    pub max_y: f64,
}

impl From<VideoAnalysis> for AnalysisDocument {
    fn from(analysis: VideoAnalysis) -> Self {
        Self {
            id: analysis.id_hex().unwrap_or_default(),
            video_id: analysis.video_id,
            data: analysis.frames,
            created_at: analysis.created_at,
            total_frames: analysis.total_frames,
            max_x: analysis.max_x,
            max_y: analysis.max_y,
        }
    }
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: AnalysisDocument,
}

#[derive(Serialize)]
pub struct VideoAnalysesResponse {
    pub success: bool,
    pub count: usize,
    pub analyses: Vec<AnalysisDocument>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Analyze a video and extract pose landmarks.
pub async fn analyze_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<(StatusCode, Json<AnalyzeResponse>)> {
    // Validate the id format before anything touches the store.
    parse_object_id(&video_id)
        .map_err(|_| ApiError::bad_request("Invalid video ID format"))?;

    info!(%video_id, "starting video analysis");
    let summary = VideoProcessor::new(state).process(&video_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(AnalyzeResponse {
            success: true,
            message: "Video analysis completed successfully".to_string(),
            analysis_id: summary.analysis_id,
            frames_processed: summary.frames_processed,
            frames_with_no_detection: summary.frames_with_no_detection,
            total_frames: summary.total_frames,
            duration: summary.duration,
            max_x: summary.max_x,
            max_y: summary.max_y,
        }),
    ))
}

/// Retrieve analysis results by id.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> ApiResult<Json<AnalysisResponse>> {
    let id = parse_object_id(&analysis_id)
        .map_err(|_| ApiError::bad_request("Invalid analysis ID format"))?;

    let analysis = state
        .store
        .analyses()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Analysis not found"))?;

    Ok(Json(AnalysisResponse {
        success: true,
        analysis: analysis.into(),
    }))
}

/// Get all analyses for a video, in insertion order.
pub async fn get_video_analyses(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<VideoAnalysesResponse>> {
    parse_object_id(&video_id)
        .map_err(|_| ApiError::bad_request("Invalid video ID format"))?;

    let analyses = state.store.analyses().list_for_video(&video_id).await?;

    Ok(Json(VideoAnalysesResponse {
        success: true,
        count: analyses.len(),
        analyses: analyses.into_iter().map(Into::into).collect(),
    }))
}

/// Delete an analysis by id.
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_object_id(&analysis_id)
        .map_err(|_| ApiError::bad_request("Invalid analysis ID format"))?;

    let existed = state.store.analyses().delete(&id).await?;
    if !existed {
        return Err(ApiError::not_found("Analysis not found"));
    }

    info!(%analysis_id, "deleted analysis");
    Ok(Json(DeleteResponse {
        success: true,
        message: "Analysis deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use posetrack_models::{LandmarkPoint, LANDMARK_COUNT};

    #[test]
    fn test_document_response_reencodes_id_as_hex_string() {
        let mut analysis = VideoAnalysis::new("507f1f77bcf86cd799439011");
        analysis.id = Some(parse_object_id("647a1f77bcf86cd799439022").unwrap());
        let points = vec![LandmarkPoint::new(0.5, 0.5, 0.0, 1.0); LANDMARK_COUNT];
        analysis.push_frame(FrameRecord::from_points("00:00:00", &points));

        let doc = AnalysisDocument::from(analysis);
        assert_eq!(doc.id, "647a1f77bcf86cd799439022");

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_id"], "647a1f77bcf86cd799439022");
        assert_eq!(json["total_frames"], 1);
        assert!(json["data"].is_array());
    }
}
