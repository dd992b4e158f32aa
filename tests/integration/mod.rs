//! Integration test suite for chromedriver-sync
//!
//! End-to-end tests that drive the public API and the binary against a local
//! `wiremock` server standing in for the Chrome for Testing dashboard and its
//! download storage. No test touches the real network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **catalog**: parsing dashboard fixtures and fetching the page
//! - **installer**: download, extraction, placement, and backup rotation
//! - **engine**: full update runs through the state machine
//! - **cli**: the `chromedriver-sync` binary

mod catalog;
mod cli;
mod engine;
mod installer;
