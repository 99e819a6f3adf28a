//! Integration test utilities for the relay
//!
//! This crate provides helpers for running end-to-end tests against the
//! WebSocket relay with real TCP peers.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
