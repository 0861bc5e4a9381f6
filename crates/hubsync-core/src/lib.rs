//! Core utilities shared by the Hubsync binary and library
//!
//! Holds the error type, platform paths and access-token resolution.

pub mod core;

pub use core::{
    format_error_with_help, resolve_token, Credentials, HubsyncError, HubsyncResult, TokenSource,
};
