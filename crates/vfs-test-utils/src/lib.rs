//! Shared test utilities for the virtual-folder-manager workspace.
//!
//! Provides folder listing fixtures shared by the crate test suites and the
//! workspace integration tests. Used as a dev-dependency only and never
//! published.
//!
//! # Modules
//!
//! - [`fixtures`]: [`TreeFixture`] builder for raw listings and hierarchies

pub mod fixtures;

pub use fixtures::{TreeFixture, ids};
