//! Shared test utilities for snapshot-preview
//!
//! Builders for snapshot requests and a preview wired to a recording surface.
