//! Integration tests for snapshot-preview
//!
//! These tests drive the controller through the tokio runtime the way a host
//! would, and exercise the replay binary end to end.

#[path = "../common/mod.rs"]
pub mod common;

pub mod preview_flow;
pub mod replay_cli;
