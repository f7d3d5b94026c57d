//! Common test utilities and fixtures for the oscache test suite.
//!
//! This module provides the scripted stub engine and shared test data used
//! across integration tests and property-based tests. Centralizing the stub
//! ensures every test exercises the same boundary contract.

pub mod fixtures;
