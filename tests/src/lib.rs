//! # Envelop Test Suite
//!
//! Unified test crate exercising the workspace crates together.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── flows.rs       # build -> sign -> encode -> decode -> verify
//! │   ├── signatures.rs  # tamper detection per signed field
//! │   └── fixtures.rs    # wire text produced by another implementation
//! └── benches/
//!     └── codec_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p envelop-tests
//!
//! # By category
//! cargo test -p envelop-tests integration::signatures::
//!
//! # Benchmarks
//! cargo bench -p envelop-tests
//! ```

pub mod integration;
