//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They receive their repositories explicitly and handle validation and
//! category reconciliation.

pub mod import_service;
pub mod transaction_service;
