//! Test harness for the grid part generators.
//!
//! Builds parts against the mock kernel and checks them with diagnostics
//! that name the part, its size and its topology on failure.
//!
//! # Key Components
//!
//! - [`helpers`] — error type, mock builds, topology counts, part summaries
//! - [`assertions`] — dimension and topology assertions with context

pub mod assertions;
pub mod helpers;

pub use helpers::{build_mock, HarnessError};
