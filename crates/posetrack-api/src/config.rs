//! API and pipeline configuration.

use std::path::PathBuf;

use posetrack_media::DetectorConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Environment (development/production)
    pub environment: String,
    /// Frame pipeline settings
    pub processing: ProcessingConfig,
    /// Pose detector settings
    pub detector: DetectorConfig,
}

/// Settings for the sampling/extraction pipeline.
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    /// Wall-clock spacing between analyzed frames, in seconds.
    pub frame_interval_secs: f64,
    /// Maximum accepted video duration, in seconds.
    pub max_duration_secs: f64,
    /// Directory holding uploaded video files.
    pub storage_root: PathBuf,
    /// Write annotated frames for each detection.
    pub debug_visualization: bool,
    /// Root directory for annotated frame output.
    pub debug_output_dir: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            processing: ProcessingConfig {
                frame_interval_secs: 1.0,
                max_duration_secs: 300.0,
                storage_root: PathBuf::from("./videos"),
                debug_visualization: false,
                debug_output_dir: PathBuf::from("./debug_output"),
            },
            detector: DetectorConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            processing: ProcessingConfig {
                frame_interval_secs: std::env::var("FRAME_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.processing.frame_interval_secs),
                max_duration_secs: std::env::var("MAX_VIDEO_DURATION")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.processing.max_duration_secs),
                storage_root: std::env::var("VIDEO_STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.processing.storage_root),
                debug_visualization: std::env::var("DEBUG_VISUALIZATION")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(defaults.processing.debug_visualization),
                debug_output_dir: std::env::var("DEBUG_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.processing.debug_output_dir),
            },
            detector: DetectorConfig {
                min_detection_confidence: std::env::var("MIN_DETECTION_CONFIDENCE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.detector.min_detection_confidence),
                model_complexity: std::env::var("MODEL_COMPLEXITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.detector.model_complexity),
                model_dir: std::env::var("POSE_MODEL_DIR").ok().map(PathBuf::from),
            },
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_service() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8001);
        assert_eq!(config.processing.frame_interval_secs, 1.0);
        assert_eq!(config.processing.max_duration_secs, 300.0);
        assert_eq!(config.detector.min_detection_confidence, 0.5);
        assert_eq!(config.detector.model_complexity, 1);
        assert!(!config.is_production());
    }
}
