//! MongoDB persistence gateway.
//!
//! This crate provides:
//! - [`StoreClient`]: dependency-injected connection with explicit
//!   connect/shutdown lifecycle
//! - [`VideoRepository`]: read access to upstream video metadata
//! - [`AnalysisRepository`]: insert/fetch/list/delete for analysis
//!   documents, keyed by store-generated 24-hex ObjectIds
//! - [`parse_object_id`]: id validation ahead of any store query

pub mod analysis_repo;
pub mod client;
pub mod error;
pub mod id;
pub mod video_repo;

pub use analysis_repo::AnalysisRepository;
pub use client::{StoreClient, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use id::parse_object_id;
pub use video_repo::{VideoRecord, VideoRepository};

// Re-export the id type used throughout the gateway API.
pub use mongodb::bson::oid::ObjectId;
