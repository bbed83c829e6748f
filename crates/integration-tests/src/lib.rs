//! Integration tests for Worko.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p worko-cli -- migrate
//!
//! # Start the server
//! cargo run -p worko-server
//!
//! # Run integration tests
//! cargo test -p worko-integration-tests -- --ignored
//! ```
//!
//! The tests live in `tests/` and talk to a running server over HTTP; they
//! are `#[ignore]`-gated so a plain `cargo test` stays self-contained.
