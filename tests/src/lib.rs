//! # Authoring Publication Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Service wiring over the in-memory adapters
//! │
//! └── integration/      # End-to-end lifecycle scenarios
//!     ├── publication_flows.rs
//!     ├── listener_flows.rs
//!     └── failure_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p authoring-tests
//!
//! # By category
//! cargo test -p authoring-tests integration::publication_flows::
//! ```

pub mod fixtures;
