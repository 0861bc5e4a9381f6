//! Hugging Face Hub integration
//!
//! This module provides:
//! - Repository file listing
//! - Resumable file downloads with integrity checks
//! - Offline verification against download metadata sidecars
//! - Token identity lookup

pub mod client;
pub mod metadata;
pub mod types;

pub use client::HubClient;
pub use metadata::DownloadMetadata;
pub use types::{FetchRequest, Identity, ModelInfo};
