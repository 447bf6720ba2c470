//! Common test utilities for all integration tests.
//!
//! Provides shared test database setup and mock providers.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

pub mod providers;
pub mod test_db;
