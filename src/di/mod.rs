//! Dependency injection infrastructure for Hubsync
//!
//! This module provides trait-based dependency injection so sync sessions
//! can run against the real Hub or against in-memory mocks.
//!
//! # Example (Production)
//! ```no_run
//! use hubsync::di::ServiceContainer;
//!
//! # fn example() -> hubsync::core::HubsyncResult<()> {
//! let container = ServiceContainer::new(None, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use hubsync::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let config = Arc::new(MockConfigProvider::default());
//! let hub = Arc::new(MockHubProvider::new());
//!
//! let container = ServiceContainer::with_providers(config, hub);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{ConfigProvider, HubProvider};
