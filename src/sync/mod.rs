//! Repository synchronization
//!
//! The pieces, in the order a session uses them:
//! - [`filter`]: include/exclude selection of remote paths
//! - [`prober`]: local validity checks
//! - [`planner`]: manifest x local state -> download plan
//! - [`fetcher`]: per-item downloads with isolated failures
//! - [`session`]: the state machine tying them together
//! - [`summary`]: what happened

pub mod fetcher;
pub mod filter;
pub mod planner;
pub mod prober;
pub mod session;
pub mod summary;

pub use fetcher::{FetchError, FetchExecutor};
pub use filter::{passes_filter, FilterRules, Pattern};
pub use planner::{build_plan, DownloadPlan, PlanItem};
pub use prober::{file_sha256, IntegrityProber};
pub use session::{SessionState, SyncSession};
pub use summary::SessionSummary;
