//! Hubsync: keep a local copy of a Hugging Face model repository complete
//!
//! This crate provides the main Hubsync library, re-exporting core
//! functionality from `hubsync-core` and organizing the Hub client and
//! the synchronization engine.

pub use hubsync_core::{format_error_with_help, HubsyncError, HubsyncResult};

/// Core module re-exported from hubsync-core.
pub mod core {
    pub use hubsync_core::core::*;
    pub use hubsync_core::*;

    /// Path module re-exported from hubsync-core.
    pub mod path {
        pub use hubsync_core::core::path::*;
    }
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// Hugging Face Hub client.
pub mod hub;

/// Manifest filtering, planning and fetching.
pub mod sync;
