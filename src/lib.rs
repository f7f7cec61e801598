//! Personal finance tracker.
//!
//! Records income and outcome transactions, each attached to a category that
//! is created on first use, and bulk-imports transactions from CSV files.
//!
//! # Architecture
//!
//! - **Services**: business rules, independent of storage and transport
//! - **Repositories**: async traits with PostgreSQL and in-memory implementations
//! - **Handlers**: Axum JSON endpoints over the services

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;
