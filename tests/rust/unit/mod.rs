//! Unit tests - public API behavior without any fixture files
//!
//! Run with: cargo test --test unit

mod schema_config_parsing;
