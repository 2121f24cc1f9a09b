//! Integration tests for Chargeboard.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p chargeboard-cli -- migrate
//!
//! # Start the server
//! cargo run -p chargeboard-server
//!
//! # Run integration tests (single-threaded: they share one server state)
//! cargo test -p chargeboard-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! # Test Categories
//!
//! - `state_api` - Read/replace with the ETag/If-Match precondition
//! - `reset_timer` - The scheduled reset trigger
//! - `users` - User directory CRUD and cascading deletion
//!
//! The base URL defaults to `http://localhost:3000` and can be overridden
//! via `CHARGEBOARD_BASE_URL`.
