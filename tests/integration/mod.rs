//! Integration tests module
//!
//! This module contains all integration tests for Hubsync CLI commands.

pub mod common;
pub mod config;
pub mod hash;
pub mod plan;
pub mod sync;
