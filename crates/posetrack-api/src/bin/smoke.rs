//! End-to-end smoke test against a running service.
//!
//! Walks every endpoint: health, analyze, fetch, list, delete.
//!
//! ```bash
//! posetrack-smoke 507f1f77bcf86cd799439011
//! POSETRACK_URL=http://localhost:8001 posetrack-smoke <video_id>
//! ```

use anyhow::{bail, Context};
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = std::env::var("POSETRACK_URL")
        .unwrap_or_else(|_| "http://localhost:8001".to_string());
    let video_id = std::env::args()
        .nth(1)
        .context("usage: posetrack-smoke <video_id>")?;

    let client = reqwest::Client::new();

    println!("smoke: checking {base_url}/health");
    let health: Value = client
        .get(format!("{base_url}/health"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    if health["status"] != "healthy" {
        bail!("health check returned {health}");
    }
    println!("smoke: service healthy");

    println!("smoke: analyzing video {video_id}");
    let response = client
        .post(format!("{base_url}/analyze/video/{video_id}"))
        .send()
        .await?;
    let status = response.status();
    let body: Value = response.json().await?;
    if status.as_u16() != 201 {
        bail!("analysis failed ({status}): {body}");
    }
    let analysis_id = body["analysis_id"]
        .as_str()
        .context("analyze response missing analysis_id")?
        .to_string();
    println!(
        "smoke: analysis {} complete ({} of {} frames, duration {}s, max_x {}, max_y {})",
        analysis_id,
        body["frames_processed"],
        body["total_frames"],
        body["duration"],
        body["max_x"],
        body["max_y"],
    );

    println!("smoke: fetching analysis {analysis_id}");
    let fetched: Value = client
        .get(format!("{base_url}/analysis/{analysis_id}"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let document = &fetched["analysis"];
    if document["_id"] != analysis_id.as_str() {
        bail!("fetched document id mismatch: {}", document["_id"]);
    }
    let frames = document["data"]
        .as_array()
        .context("document missing data array")?;
    println!(
        "smoke: document holds {} frame records (total_frames={})",
        frames.len(),
        document["total_frames"],
    );
    if let Some(first) = frames.first() {
        println!("smoke: first frame at {}", first["timestamp"]);
        if let Some(nose) = first["landmarks"]["nose"].as_object() {
            println!(
                "smoke:   nose x={} y={} z={} visibility={}",
                nose["x"], nose["y"], nose["z"], nose["visibility"],
            );
        }
    }

    println!("smoke: listing analyses for video {video_id}");
    let listed: Value = client
        .get(format!("{base_url}/analysis/video/{video_id}"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("smoke: video has {} analyses", listed["count"]);

    println!("smoke: deleting analysis {analysis_id}");
    client
        .delete(format!("{base_url}/analysis/{analysis_id}/delete"))
        .send()
        .await?
        .error_for_status()?;

    // The document must be gone now.
    let after_delete = client
        .get(format!("{base_url}/analysis/{analysis_id}"))
        .send()
        .await?;
    if after_delete.status().as_u16() != 404 {
        bail!(
            "deleted analysis still retrievable (status {})",
            after_delete.status()
        );
    }

    println!("smoke: ok");
    Ok(())
}
