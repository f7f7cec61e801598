//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// Category labels
pub mod category;
/// Income and outcome records
pub mod transaction;
