//! Financial Health Analysis API Library
//!
//! This library provides the core functionality for the financial health
//! analysis API: document-to-metrics extraction, AI risk analysis with a
//! deterministic fallback, localized report composition, and encrypted
//! persistence.
//!
//! # Modules
//!
//! - `analysis`: AI risk analysis orchestration and simulated fallback.
//! - `config`: Configuration management.
//! - `crypto`: Per-field encryption at rest.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Encrypted analysis record storage.
//! - `errors`: Error handling types.
//! - `extract`: Document format detection and figure extraction.
//! - `handlers`: HTTP request handlers.
//! - `metrics`: Solvency metric derivation.
//! - `models`: Core data models.
//! - `report`: Localized investor report composition.

pub mod analysis;
pub mod config;
pub mod crypto;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod report;
