//! Cross-crate integration tests.

pub mod fixtures;
pub mod flows;
pub mod signatures;
